//! Terminal rendering for the command-line front end.

use intentflow::errors::IntentflowError;
use intentflow::events::EventSink;
use intentflow::tools::ToolDefinition;
use intentflow::RequestOutcome;
use serde_json::Value;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;

/// Example requests shown in the banner, help and usage guidance.
pub const EXAMPLES: [&str; 3] = [
    "下载视频 https://example.com/video.mp4 并发送到 user@email.com",
    "翻译 https://site.com/lecture.mp4 的字幕，上传到COS，生成报告",
    "剪辑视频 https://video.com/long.mp4 并通知 admin@company.com",
];

/// Prints workflow progress events as they happen.
#[derive(Debug, Default)]
pub struct ConsoleEventSink;

impl EventSink for ConsoleEventSink {
    fn try_emit(&self, event_type: &str, data: Option<Value>) {
        if let Some(line) = render_event(event_type, data.as_ref()) {
            println!("{line}");
        }
    }
}

fn field<'a>(data: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    data.and_then(|d| d.get(key))
}

fn text_field<'a>(data: Option<&'a Value>, key: &str) -> &'a str {
    field(data, key).and_then(Value::as_str).unwrap_or_default()
}

fn number_field(data: Option<&Value>, key: &str) -> u64 {
    field(data, key).and_then(Value::as_u64).unwrap_or_default()
}

/// Formats one event, or returns `None` for events with no console form.
pub fn render_event(event_type: &str, data: Option<&Value>) -> Option<String> {
    match event_type {
        "workflow.planned" => Some(render_plan(data)),
        "workflow.started" => Some(format!(
            "Running workflow ({} steps)...",
            number_field(data, "steps")
        )),
        "step.started" => Some(format!(
            "--- Step {}/{}: {} ---",
            number_field(data, "step"),
            number_field(data, "total"),
            text_field(data, "description"),
        )),
        "step.completed" => Some(format!("[ok] {}\n", text_field(data, "message"))),
        "step.failed" => Some(format!(
            "[failed] step {} ({})",
            number_field(data, "step"),
            text_field(data, "tool"),
        )),
        "workflow.cancelled" => Some(format!(
            "[cancelled] at step {}: {}",
            number_field(data, "step"),
            text_field(data, "reason"),
        )),
        _ => None,
    }
}

/// Numbered plan listing built from the serialized steps in a
/// `workflow.planned` payload.
fn render_plan(data: Option<&Value>) -> String {
    let steps = field(data, "plan")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut text = format!("Workflow plan ({} steps):", steps.len());
    for (i, step) in steps.iter().enumerate() {
        let description = step
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let _ = write!(text, "\n  {}. {description}", i + 1);
    }
    text.push('\n');
    text
}

/// A horizontal rule.
pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

pub fn print_welcome() {
    println!("Intentflow: video workflow engine");
    println!("{}", rule('='));
    println!("Download, translate, clip, upload, report and email, from one sentence.");
    println!("Examples:");
    for example in EXAMPLES {
        println!("  - {example}");
    }
}

pub fn print_capabilities(tools: &[ToolDefinition]) {
    println!("Available tools:");
    for tool in tools {
        println!("  - {}: {}", tool.name, tool.description);
    }
}

pub fn print_help() {
    println!("\nHelp:");
    println!("  Describe what you want in plain language, including the video URL.");
    println!("  Supported actions: download, translate, clip, upload, report, email.");
    println!("  help | h            show this help");
    println!("  capabilities | cap  list available tools");
    println!("  clear | cls         clear the screen");
    println!("  quit | exit | q     leave");
    println!("\nExamples:");
    for example in EXAMPLES {
        println!("  - {example}");
    }
}

pub fn clear_screen() {
    print!("\x1b[H\x1b[2J");
}

/// Guidance shown when a request yields no plan.
pub fn usage_guidance() -> String {
    let mut text = String::from(
        "Sorry, I could not work out what to do. Please make the request more specific:\n\
         \x20 - include a video URL\n\
         \x20 - name the actions you want (download, translate, upload, ...)\n\
         \x20 - give an email address if you want a notification\n\
         Try for example:",
    );
    for example in &EXAMPLES[..2] {
        text.push_str("\n  - ");
        text.push_str(example);
    }
    text
}

/// Prints how a request ended.
pub fn print_outcome(result: &Result<RequestOutcome, IntentflowError>) {
    match result {
        Ok(RequestOutcome::Completed { steps }) => {
            println!("Workflow finished ({steps} steps).");
        }
        Ok(RequestOutcome::Declined) => println!("Cancelled by user."),
        Err(IntentflowError::Unplannable) => println!("{}", usage_guidance()),
        Err(err) => println!("Execution failed: {err}"),
    }
}
