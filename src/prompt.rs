//! Prompt compiler: turns scenes and a project type into the single
//! instruction document sent to the completion service.
//!
//! Compilation is pure and deterministic. Identical inputs always produce
//! byte-identical output.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::model::{ProjectType, Scene};
use crate::templates::{COPILOT_COMPILER_INSTRUCTION, CURSOR_COMPILER_INSTRUCTION};

/// Placeholder for a blank scene title.
pub const UNNAMED_SCENE: &str = "未命名";
/// Placeholder for blank objective, layout and interactions.
pub const UNSPECIFIED: &str = "未指定";
/// Placeholder for blank references.
pub const NONE: &str = "無";

/// Which AI coding assistant the compiled document targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTarget {
    #[default]
    Cursor,
    Copilot,
}

impl PromptTarget {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cursor => "Cursor",
            Self::Copilot => "Copilot",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Cursor => CURSOR_COMPILER_INSTRUCTION,
            Self::Copilot => COPILOT_COMPILER_INSTRUCTION,
        }
    }
}

/// Blank values (empty after trimming) become `placeholder`; anything else
/// is embedded exactly as typed.
fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

/// Render the numbered requirement block for every scene.
pub fn render_scenes(scenes: &[Scene]) -> String {
    let mut out = String::new();
    for (index, scene) in scenes.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "場景 {}: {}",
            index + 1,
            or_placeholder(&scene.title, UNNAMED_SCENE)
        );
        let _ = writeln!(out, "- 目標: {}", or_placeholder(&scene.objective, UNSPECIFIED));
        let _ = writeln!(out, "- 畫面: {}", or_placeholder(&scene.layout, UNSPECIFIED));
        let _ = writeln!(
            out,
            "- 互動: {}",
            or_placeholder(&scene.interactions, UNSPECIFIED)
        );
        let _ = writeln!(
            out,
            "- 參考資料/API文件: {}",
            or_placeholder(scene.references.as_deref().unwrap_or(""), NONE)
        );
    }
    out
}

/// Compile scenes into the Cursor prompt-pack request.
pub fn compile(scenes: &[Scene], project_type: ProjectType) -> String {
    compile_for(PromptTarget::Cursor, scenes, project_type)
}

/// Compile scenes for a specific assistant.
pub fn compile_for(target: PromptTarget, scenes: &[Scene], project_type: ProjectType) -> String {
    let scene_block = render_scenes(scenes);
    match target {
        PromptTarget::Cursor => format!(
            "{instruction}\n\n\
             ---\n\
             **[模擬使用者回應]**\n\n\
             Jacky 編譯器你好，我已經想好我的專案需求了，請直接幫我編譯成 P0~P6 的 Prompts。\n\n\
             **1. 專案類型選擇：**\n\
             我選擇：{project_type}\n\
             （請依照你的「技術棧自動對應」規則，自動決定技術棧，不需要再問我。）\n\n\
             **2. 場景需求：**\n\
             {scene_block}\n\
             請開始輸出 P0 到 P6 的完整 Prompt 腳本。\n",
            instruction = target.instruction(),
            project_type = project_type.as_str(),
            scene_block = scene_block,
        ),
        PromptTarget::Copilot => format!(
            "{instruction}\n\n\
             ---\n\
             **專案資訊：**\n\
             專案類型：{project_type}\n\
             場景需求：\n\
             {scene_block}\n\
             請輸出適合 GitHub Copilot 的開發指令。\n",
            instruction = target.instruction(),
            project_type = project_type.as_str(),
            scene_block = scene_block,
        ),
    }
}
