use crate::device_display::interface::{DeviceDisplay, UiEvent, View};
use crate::device_display::subscribers::UiEventSubscribers;
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

const WIDTH: usize = 48;
const BAR_WIDTH: usize = 20;

pub const HELP: &str = "commands: start | stop | upload <path> | threshold <0..1> | lookup | quit";

pub fn parse_command(line: &str) -> Result<UiEvent, String> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match (command.to_lowercase().as_str(), argument) {
        ("start", "") => Ok(UiEvent::StartCamera),
        ("stop", "") => Ok(UiEvent::StopCamera),
        ("lookup", "") => Ok(UiEvent::RemoteLookup),
        ("quit" | "exit", "") => Ok(UiEvent::Quit),
        ("upload", "") => Err("upload needs a path".to_string()),
        ("upload", path) => Ok(UiEvent::Upload(PathBuf::from(path))),
        ("threshold", value) => value
            .parse::<f32>()
            .map(UiEvent::ThresholdChanged)
            .map_err(|_| format!("Not a number: {:?}", value)),
        _ => Err(format!("Unknown command: {:?}", line)),
    }
}

fn bar(probability: f32) -> String {
    let filled = (probability.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_lines(view: &View) -> Vec<String> {
    let mut lines = vec![view.status.clone()];

    if let Some(notice) = &view.notice {
        lines.push(format!("! {}", notice));
    }

    let camera = if view.camera_running { "on" } else { "off" };
    lines.push(format!("camera {} | threshold {:.2}", camera, view.threshold));

    if let Some(preview) = &view.preview {
        lines.push(format!("preview {}x{}", preview.width(), preview.height()));
    }

    if !view.predictions.is_empty() {
        lines.push(String::new());
        for prediction in &view.predictions {
            lines.push(format!(
                "{:<14} {:>5.1}% {}",
                prediction.label,
                prediction.probability * 100.0,
                bar(prediction.probability)
            ));
        }
    }

    if !view.nutrition.is_empty() {
        lines.push(String::new());
        lines.extend(view.nutrition.iter().cloned());
    }

    if let Some(action) = &view.lookup_action {
        lines.push(format!("[lookup] {}", action));
    }

    lines
}

pub fn boxed(lines: &[String]) -> String {
    let fit = |line: &str| {
        let mut text = line.chars().take(WIDTH).collect::<String>();
        let len = text.chars().count();
        text.push_str(&" ".repeat(WIDTH - len));
        text
    };

    let mut out = format!("┌{}┐\n", "─".repeat(WIDTH + 2));
    for line in lines {
        out.push_str(&format!("│ {} │\n", fit(line)));
    }
    out.push_str(&format!("└{}┘", "─".repeat(WIDTH + 2)));
    out
}

/// Text display on stdout, commands from stdin.
pub struct DeviceDisplayConsole {
    subscribers: UiEventSubscribers,
    last_printed: Option<Vec<String>>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        let subscribers = UiEventSubscribers::new();

        let input = subscribers.clone();
        std::thread::spawn(move || {
            println!("{}", HELP);
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(event) => input.publish(event),
                    Err(message) => println!("{}\n{}", message, HELP),
                }
            }
            input.publish(UiEvent::Quit);
        });

        Self {
            subscribers,
            last_printed: None,
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = render_lines(view);
        if self.last_printed.as_ref() == Some(&lines) {
            return Ok(());
        }

        println!("{}", boxed(&lines));
        self.last_printed = Some(lines);
        Ok(())
    }

    fn events(&self) -> Receiver<UiEvent> {
        self.subscribers.subscribe()
    }
}
