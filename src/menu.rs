use crate::cache::{self, CollisionPolicy};
use crate::committer;
use crate::replacer;
use crate::scanner;
use anyhow::Result;
use log::{error, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// What the loop does after an entry ran
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Exit,
}

type Action<R, W> = fn(&mut Menu<R, W>) -> Result<Flow>;

struct MenuEntry<R, W> {
    key: &'static str,
    label: &'static str,
    action: Action<R, W>,
}

fn entries<R: BufRead, W: Write>() -> [MenuEntry<R, W>; 5] {
    [
        MenuEntry { key: "1", label: "Discover and cache code.txt files", action: Menu::discover_and_cache },
        MenuEntry { key: "2", label: "Commit cached files with new extension", action: Menu::commit },
        MenuEntry { key: "3", label: "Parse aggregate.txt with rules", action: Menu::parse },
        MenuEntry { key: "4", label: "Clear cache", action: Menu::clear_cache },
        MenuEntry { key: "5", label: "Exit", action: Menu::exit },
    ]
}

/// Settings the menu passes through to each operation
#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub target_name: String,
    pub policy: CollisionPolicy,
    pub commit_dir: PathBuf,
    pub show_banner: bool,
}

/// Blocking read-eval loop over a numbered dispatch table
pub struct Menu<R, W> {
    input: R,
    output: W,
    settings: MenuSettings,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, settings: MenuSettings) -> Self {
        Self { input, output, settings }
    }

    /// Run until the exit entry is chosen or input ends.
    ///
    /// Operation failures are logged and the menu keeps going.
    pub fn run(&mut self) -> Result<()> {
        if self.settings.show_banner {
            writeln!(self.output, "\nWelcome to compose: discover, cache, commit and parse code snippets")?;
        }

        let table = entries::<R, W>();
        loop {
            writeln!(self.output, "\nChoose an option:")?;
            for entry in &table {
                writeln!(self.output, "{}. {}", entry.key, entry.label)?;
            }

            let choice = match self.prompt("Enter choice [1-5]: ")? {
                Some(choice) => choice,
                None => break,
            };

            let Some(entry) = table.iter().find(|entry| entry.key == choice) else {
                writeln!(self.output, "Invalid choice. Try again.")?;
                continue;
            };

            match (entry.action)(self) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {},
                Err(err) => error!("{:#}", err),
            }
        }

        Ok(())
    }

    /// Print `message` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn discover_and_cache(&mut self) -> Result<Flow> {
        let Some(parent) = self.prompt("Enter parent directory to scan: ")? else { return Ok(Flow::Exit) };
        let Some(cache_dir) = self.prompt("Enter cache directory: ")? else { return Ok(Flow::Exit) };
        let cache_dir = PathBuf::from(cache_dir);

        let files = scanner::discover(Path::new(&parent), &self.settings.target_name);
        if files.is_empty() {
            warn!("No {} files found.", self.settings.target_name);
            return Ok(Flow::Continue);
        }

        cache::cache_files(&files, &cache_dir, &cache::aggregate_path(&cache_dir), self.settings.policy)?;
        Ok(Flow::Continue)
    }

    fn commit(&mut self) -> Result<Flow> {
        let Some(cache_dir) = self.prompt("Enter cache directory: ")? else { return Ok(Flow::Exit) };
        let Some(new_ext) = self.prompt("Enter new file extension (e.g., .py): ")? else { return Ok(Flow::Exit) };

        committer::commit(Path::new(&cache_dir), &self.settings.commit_dir, &new_ext)?;
        Ok(Flow::Continue)
    }

    fn parse(&mut self) -> Result<Flow> {
        let Some(cache_dir) = self.prompt("Enter cache directory: ")? else { return Ok(Flow::Exit) };
        let Some(rules_file) = self.prompt("Enter path to rules JSON file: ")? else { return Ok(Flow::Exit) };

        let aggregate = cache::aggregate_path(Path::new(&cache_dir));
        replacer::parse_aggregate(&aggregate, Path::new(&rules_file), None)?;
        Ok(Flow::Continue)
    }

    fn clear_cache(&mut self) -> Result<Flow> {
        let Some(cache_dir) = self.prompt("Enter cache directory to clear: ")? else { return Ok(Flow::Exit) };

        cache::clear_cache(Path::new(&cache_dir))?;
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> Result<Flow> {
        writeln!(self.output, "Goodbye")?;
        Ok(Flow::Exit)
    }
}
