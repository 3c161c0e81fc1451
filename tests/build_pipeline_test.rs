//! 构建流水线集成测试
//!
//! 用假图片后端搭建完整内容树，验证端到端的扇出/扇入行为：
//! 索引形态、空位保留、部分失败降级、输出重置和幂等性。

use quiz_image_builder::error::{BuildError, BuildResult};
use quiz_image_builder::infrastructure::{ImageBackend, ImageMeta};
use quiz_image_builder::orchestrator::BuildCoordinator;
use quiz_image_builder::utils::logging;
use quiz_image_builder::Config;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 假图片后端
///
/// - identify: 从文件首行解析 "宽x高"
/// - resize: 回显带宽度标记的字节；源内容含 `FAIL-<宽度>` 时该宽度失败
struct FakeBackend;

impl ImageBackend for FakeBackend {
    fn identify(&self, path: &Path) -> BuildResult<ImageMeta> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BuildError::identify_failed(e.to_string()))?;
        let dims = content.lines().next().unwrap_or("");
        let (w, h) = dims.split_once('x').unwrap_or(("", ""));
        Ok(ImageMeta {
            width: w.parse().ok(),
            height: h.parse().ok(),
        })
    }

    fn resize(&self, bytes: &[u8], width: u32, _format: &str) -> BuildResult<Vec<u8>> {
        let content = String::from_utf8_lossy(bytes);
        if content.contains(&format!("FAIL-{}", width)) {
            return Err(BuildError::resize_failed("模拟工具错误"));
        }
        Ok(format!("resized-{}", width).into_bytes())
    }
}

/// 测试夹具：临时目录下的内容树 + 配置
struct Fixture {
    _dir: TempDir,
    content_root: PathBuf,
    output_root: PathBuf,
    config: Config,
}

impl Fixture {
    fn new() -> Self {
        logging::init();
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let content_root = dir.path().join("content");
        let output_root = dir.path().join("dist");
        std::fs::create_dir_all(&content_root).unwrap();

        let config = Config {
            content_root: content_root.to_string_lossy().into_owned(),
            output_root: output_root.to_string_lossy().into_owned(),
            target_widths: vec![320, 640],
            ..Config::default()
        };
        Self {
            _dir: dir,
            content_root,
            output_root,
            config,
        }
    }

    fn write_round_index(&self, json: &str) {
        std::fs::write(self.content_root.join("index.json"), json).unwrap();
    }

    /// 写一道题目：元数据 + 三张 png 源图（内容为 "宽x高"）
    fn write_question(&self, dir: &str, meta: &str, dims: &str) {
        let q_dir = self.content_root.join(dir);
        std::fs::create_dir_all(&q_dir).unwrap();
        std::fs::write(q_dir.join("index.json"), meta).unwrap();
        for role in ["a", "b", "mix"] {
            std::fs::write(q_dir.join(format!("{}.png", role)), dims).unwrap();
        }
    }

    async fn run(&self) -> quiz_image_builder::BuildStats {
        BuildCoordinator::new(self.config.clone(), Arc::new(FakeBackend))
            .run()
            .await
            .expect("构建应该成功完成")
    }

    fn read_index(&self) -> JsonValue {
        let content = std::fs::read_to_string(self.output_root.join("index.json"))
            .expect("索引文件应该存在");
        serde_json::from_str(&content).unwrap()
    }
}

#[tokio::test]
async fn test_happy_path_two_questions() {
    let fixture = Fixture::new();
    fixture.write_round_index(r#"[{"title": "Round 1", "questions": ["q0", "q1"]}]"#);
    fixture.write_question("q0", r#"{"prompt": "第一题"}"#, "100x50");
    fixture.write_question("q1", r#"{"prompt": "第二题"}"#, "200x200");

    let stats = fixture.run().await;
    assert_eq!(stats.rounds, 1);
    assert_eq!(stats.questions_processed, 2);
    assert_eq!(stats.questions_skipped, 0);
    // 2 题 × 3 角色 × 2 宽度
    assert_eq!(stats.variants_written, 12);

    let index = fixture.read_index();
    let rounds = index["rounds"].as_array().unwrap();
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0]["title"], "Round 1");
    assert_eq!(rounds[0]["roundId"], 0);

    let questions = rounds[0]["questionsData"].as_array().unwrap();
    assert_eq!(questions.len(), 2);

    // 题目编号是 0..n-1 的连续序列，按声明顺序排列
    for (i, question) in questions.iter().enumerate() {
        assert_eq!(question["questionId"], i);
        assert_eq!(question["roundData"]["roundId"], 0);
        assert_eq!(question["roundData"]["title"], "Round 1");
        let srcs = question["imgs"]["a"]["srcs"].as_object().unwrap();
        assert!(srcs.contains_key("320"));
        assert!(srcs.contains_key("640"));
    }

    // 宽高比来自源图尺寸
    assert_eq!(questions[0]["imgs"]["a"]["aspectRatio"], 0.5);
    assert_eq!(questions[1]["imgs"]["a"]["aspectRatio"], 1.0);

    // 变体文件按确定性命名写到磁盘
    let variant = fixture
        .output_root
        .join("imgs/round-0/question-0/a/r0q0.a.320.jpg");
    assert_eq!(std::fs::read(variant).unwrap(), b"resized-320");

    // API 路径剥掉输出根目录，换上 API 前缀
    assert_eq!(
        questions[0]["imgs"]["a"]["srcs"]["320"],
        "/api/imgs/round-0/question-0/a/r0q0.a.320.jpg"
    );
}

#[tokio::test]
async fn test_example_question_is_separate_from_numbering() {
    let fixture = Fixture::new();
    fixture.write_round_index(
        r#"[{"title": "R", "questions": ["q0"], "example": "ex"}]"#,
    );
    fixture.write_question("q0", r#"{"prompt": "正式"}"#, "100x100");
    fixture.write_question("ex", r#"{"prompt": "示例"}"#, "100x100");

    fixture.run().await;

    let index = fixture.read_index();
    let round = &index["rounds"][0];

    // 示例题不占用编号序列
    let questions = round["questionsData"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["questionId"], 0);

    let example = &round["exampleData"];
    assert_eq!(example["questionId"], "example");
    assert_eq!(example["prompt"], "示例");

    // 示例题的变体写到 question-example 目录
    assert!(fixture
        .output_root
        .join("imgs/round-0/question-example/a/r0qexample.a.320.jpg")
        .exists());
}

#[tokio::test]
async fn test_malformed_meta_leaves_null_slot() {
    let fixture = Fixture::new();
    fixture.write_round_index(r#"[{"title": "R", "questions": ["q0", "bad", "q2"]}]"#);
    fixture.write_question("q0", r#"{"n": 0}"#, "100x100");
    fixture.write_question("q2", r#"{"n": 2}"#, "100x100");
    // bad 的元数据无法解析
    let bad_dir = fixture.content_root.join("bad");
    std::fs::create_dir_all(&bad_dir).unwrap();
    std::fs::write(bad_dir.join("index.json"), "{ 不是 json").unwrap();

    let stats = fixture.run().await;
    assert_eq!(stats.questions_processed, 2);
    assert_eq!(stats.questions_skipped, 1);

    // 构建照常完成，索引写出；坏题目留下 null 空位，下标不压缩
    let index = fixture.read_index();
    let questions = index["rounds"][0]["questionsData"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0]["questionId"], 0);
    assert!(questions[1].is_null());
    assert_eq!(questions[2]["questionId"], 2);
}

#[tokio::test]
async fn test_single_width_failure_only_drops_that_variant() {
    let fixture = Fixture::new();
    fixture.write_round_index(r#"[{"title": "R", "questions": ["q0", "q1"]}]"#);
    fixture.write_question("q0", r#"{"n": 0}"#, "100x100");
    fixture.write_question("q1", r#"{"n": 1}"#, "100x100");
    // 只有 q0 的 mix 在 640 宽度上失败
    std::fs::write(
        fixture.content_root.join("q0/mix.png"),
        "100x100\nFAIL-640",
    )
    .unwrap();

    fixture.run().await;

    let index = fixture.read_index();
    let questions = index["rounds"][0]["questionsData"].as_array().unwrap();

    let q0_mix = questions[0]["imgs"]["mix"]["srcs"].as_object().unwrap();
    assert_eq!(q0_mix.keys().collect::<Vec<_>>(), vec!["320"]);

    // 其余角色 / 题目不受影响
    assert_eq!(
        questions[0]["imgs"]["a"]["srcs"].as_object().unwrap().len(),
        2
    );
    assert_eq!(
        questions[1]["imgs"]["mix"]["srcs"].as_object().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_missing_source_image_fails_only_that_role() {
    let fixture = Fixture::new();
    fixture.write_round_index(r#"[{"title": "R", "questions": ["q0"]}]"#);
    fixture.write_question("q0", r#"{"n": 0}"#, "100x100");
    // 删掉 b 的唯一源图，两种格式都不存在
    std::fs::remove_file(fixture.content_root.join("q0/b.png")).unwrap();

    let stats = fixture.run().await;
    assert_eq!(stats.questions_processed, 1);

    let index = fixture.read_index();
    let imgs = &index["rounds"][0]["questionsData"][0]["imgs"];
    assert!(imgs.get("b").is_none());
    assert!(imgs.get("a").is_some());
    assert!(imgs.get("mix").is_some());
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_clears_old_output() {
    let fixture = Fixture::new();
    fixture.write_round_index(r#"[{"title": "R", "questions": ["q0"]}]"#);
    fixture.write_question("q0", r#"{"n": 0}"#, "100x50");

    fixture.run().await;
    let first_index = std::fs::read_to_string(fixture.output_root.join("index.json")).unwrap();

    // 在输出树里埋一个残留文件，重跑后必须消失
    let stray = fixture.output_root.join("imgs/stray.txt");
    std::fs::write(&stray, "leftover").unwrap();

    let stats = fixture.run().await;
    let second_index = std::fs::read_to_string(fixture.output_root.join("index.json")).unwrap();

    assert_eq!(first_index, second_index);
    assert!(!stray.exists());
    assert_eq!(stats.variants_written, 6);
}

#[tokio::test]
async fn test_empty_round_index_still_writes_index() {
    let fixture = Fixture::new();
    fixture.write_round_index("[]");

    let stats = fixture.run().await;
    assert_eq!(stats.rounds, 0);

    let index = fixture.read_index();
    assert_eq!(index["rounds"].as_array().unwrap().len(), 0);
}

/// 真实 GraphicsMagick 后端的冒烟测试
/// 默认忽略，需要装好 gm 后手动运行：cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_graphicsmagick_smoke() {
    use quiz_image_builder::GraphicsMagickBackend;

    let backend = GraphicsMagickBackend::new();
    let meta = backend.identify(Path::new("testdata/sample.png")).unwrap();
    assert!(meta.width.is_some());
}
