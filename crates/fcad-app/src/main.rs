//! FCAD 交互回放程序
//!
//! 读取布局和交互脚本，逐步交给几何交互引擎执行，每一步输出一行 JSON，
//! 最后输出修改后的布局。
//!
//! 用法: `fcad-app <layout.json> <script.json> [config.json] [-v]`

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fcad_core::prelude::*;

/// 交互脚本
#[derive(Debug, Deserialize)]
struct Script {
    steps: Vec<Step>,
}

/// 脚本步骤
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum Step {
    /// 约束拖动
    Drag { entity: EntityRef, point: Point2 },
    /// 自由拖动节点（带捕捉）
    MoveNode { id: String, point: Point2 },
    /// 松开鼠标，对移动过的节点做自动连线
    Release { moved: Vec<String> },
    /// 只查询捕捉结果
    Snap {
        point: Point2,
        #[serde(default)]
        exclude: Option<String>,
    },
}

/// 命令行参数
struct Args {
    layout: String,
    script: String,
    config: Option<String>,
    verbose: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut verbose = false;
        let mut positional = Vec::new();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "-v" | "--verbose" => verbose = true,
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let (Some(layout), Some(script)) = (positional.next(), positional.next()) else {
            bail!("usage: fcad-app <layout.json> <script.json> [config.json] [-v]");
        };
        Ok(Self {
            layout,
            script,
            config: positional.next(),
            verbose,
        })
    }
}

fn read(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

/// 执行一步，返回结果描述
fn run_step(engine: &InteractionEngine, layout: &mut LayoutModel, step: &Step) -> Value {
    match step {
        Step::Drag { entity, point } => {
            let projection = engine.project_to_constraint(layout, entity, *point);
            let warnings = engine.collision_warnings(layout, entity, projection.point);
            let accepted = engine.update_entity_position(layout, entity, *point);
            json!({
                "action": "drag",
                "entity": entity,
                "accepted": accepted,
                "projection": projection,
                "warnings": warnings,
                "guide": engine.constraint_guide(layout, entity),
            })
        }
        Step::MoveNode { id, point } => {
            let result = engine.move_node(layout, id, *point);
            json!({
                "action": "moveNode",
                "id": id,
                "accepted": result.is_some(),
                "snap": result,
            })
        }
        Step::Release { moved } => {
            let created = engine.detect_and_connect(layout, moved.as_slice());
            json!({
                "action": "release",
                "moved": moved,
                "pathsCreated": created,
            })
        }
        Step::Snap { point, exclude } => {
            let result = engine.snap(layout, *point, exclude.as_deref());
            json!({
                "action": "snap",
                "snap": result,
                "spacing": engine.calculate_spacing(layout),
            })
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse()?;

    // 初始化日志
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let mut layout = LayoutModel::from_json(&read(&args.layout)?)
        .with_context(|| format!("invalid layout {}", args.layout))?;
    let script: Script = serde_json::from_str(&read(&args.script)?)
        .with_context(|| format!("invalid script {}", args.script))?;
    let config = match &args.config {
        Some(path) => {
            EngineConfig::from_json(&read(path)?).with_context(|| format!("invalid config {}", path))?
        }
        None => EngineConfig::default(),
    };

    info!(
        "回放 {} 步，布局包含 {} 个节点、{} 台桥吊、{} 台悬臂吊、{} 个区域",
        script.steps.len(),
        layout.nodes().len(),
        layout.overhead_cranes().len(),
        layout.jib_cranes().len(),
        layout.zones().len()
    );

    let engine = InteractionEngine::new(config);
    layout.capture_animation_start();

    for (index, step) in script.steps.iter().enumerate() {
        let mut outcome = run_step(&engine, &mut layout, step);
        outcome["step"] = json!(index);
        println!("{}", serde_json::to_string(&outcome)?);
    }

    println!("{}", serde_json::to_string_pretty(&layout.to_snapshot())?);
    Ok(())
}
