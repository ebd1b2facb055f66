//! Terminal rendering for plans, events and summaries
//!
//! Markdown produced by the core `Display` impls is printed through termimad
//! when color is enabled, or as-is otherwise.

use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        skin.code_block.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints a markdown document.
    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            for line in markdown.lines() {
                if line.starts_with('#') {
                    // Headers keep their hashes so nesting stays visible
                    println!("\x1b[36m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
            if !markdown.ends_with('\n') {
                println!();
            }
        }
    }

    /// Prints one event or status line.
    pub fn line(&self, text: &str) {
        if self.rich_enabled {
            self.skin.print_inline(text);
            println!();
        } else {
            println!("{text}");
        }
    }

    /// Prints an error line to stderr.
    pub fn error(&self, text: &str) {
        if self.rich_enabled {
            eprintln!("\x1b[31m{text}\x1b[0m");
        } else {
            eprintln!("{text}");
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
