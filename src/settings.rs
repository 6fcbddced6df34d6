use crate::workspace::Workspace;
use crate::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// File name of the saved settings, stored next to the executable.
pub const CONFIG_FILE_NAME: &str = ".slides-config.json";

/// Folder name suggested below Desktop, Documents or the home folder.
const SUGGESTED_FOLDER: &str = "slides-to-markdown";

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub working_dir: PathBuf,
}

impl Settings {
    /// Loads saved settings. A missing or unreadable file yields `None`.
    pub fn load(path: &Path) -> Option<Settings> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                debug!("Ignoring malformed settings {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Decides which directory holds the `input/`, `processed/` and `output/` folders.
///
/// An explicit directory other than `.` always wins, then a saved working directory that still
/// exists, then `default_dir`.
pub fn resolve_working_dir(cli_dir: Option<&Path>, config_path: &Path, default_dir: &Path) -> PathBuf {
    if let Some(dir) = cli_dir.filter(|dir| *dir != Path::new(".")) {
        return absolute(dir);
    }

    if let Some(settings) = Settings::load(config_path) {
        if settings.working_dir.exists() {
            return absolute(&settings.working_dir);
        }
        debug!("Saved working directory {} no longer exists", settings.working_dir.display());
    }

    absolute(default_dir)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~"), home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(input),
    }
}

/// Suggested working directories for the current platform, labelled for the setup menu.
pub fn default_locations(here: &Path, home: Option<&Path>) -> Vec<(String, PathBuf)> {
    let mut options = vec![("Here (next to the program)".to_string(), here.to_path_buf())];

    if let Some(home) = home {
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            options.push(("Desktop".to_string(), home.join("Desktop").join(SUGGESTED_FOLDER)));
            options.push(("Documents".to_string(), home.join("Documents").join(SUGGESTED_FOLDER)));
        } else {
            options.push(("Home folder".to_string(), home.join(SUGGESTED_FOLDER)));
        }
    }

    options
}

/// Reads one trimmed line, `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Guides the user through choosing a working directory.
///
/// The chosen directory gets its folder structure and is saved to `config_path`. Returns `None`
/// when the input ends before a choice was made.
pub fn interactive_setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    here: &Path,
    config_path: &Path,
) -> Result<Option<PathBuf>> {
    let rule = "=".repeat(50);
    writeln!(output, "{}\n  Slides to Markdown - First-time Setup\n{}\n", rule, rule)?;
    writeln!(output, "Where would you like the working folders")?;
    writeln!(output, "(input/, output/, processed/) to be created?\n")?;

    let options = default_locations(here, home_dir().as_deref());
    for (idx, (label, path)) in options.iter().enumerate() {
        writeln!(output, "  [{}] {}\n      {}\n", idx + 1, label, path.display())?;
    }
    let custom = options.len() + 1;
    writeln!(output, "  [{}] Custom path\n", custom)?;

    let chosen = loop {
        write!(output, "Choose an option [1-{}]: ", custom)?;
        output.flush()?;

        let Some(choice) = read_line(input)? else {
            writeln!(output, "\nSetup cancelled.")?;
            return Ok(None);
        };

        match choice.parse::<usize>() {
            Ok(n) if (1..custom).contains(&n) => break options[n - 1].1.clone(),
            Ok(n) if n == custom => {
                write!(output, "Enter the full path: ")?;
                output.flush()?;
                match read_line(input)? {
                    None => {
                        writeln!(output, "\nSetup cancelled.")?;
                        return Ok(None);
                    }
                    Some(path) if path.is_empty() => writeln!(output, "No path entered. Please try again.")?,
                    Some(path) => break expand_home(&path),
                }
            }
            _ => writeln!(output, "Please enter a number between 1 and {}.", custom)?,
        }
    };

    let chosen = absolute(&chosen);
    writeln!(output, "\nSetting up in: {}", chosen.display())?;
    Workspace::create(&chosen)?;

    Settings { working_dir: chosen.clone() }.save(config_path)?;
    info!("Saved settings to {}", config_path.display());
    writeln!(output, "Future runs will use: {}", chosen.display())?;
    writeln!(output, "(Override anytime with --dir or re-run --setup)")?;

    Ok(Some(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_settings_roundtrip_and_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert_eq!(Settings::load(&path), None);

        let settings = Settings { working_dir: dir.path().join("work") };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), Some(settings));

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), None);
    }

    #[test]
    fn test_explicit_dir_wins() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE_NAME);
        Settings { working_dir: dir.path().to_path_buf() }.save(&config).unwrap();

        let explicit = dir.path().join("explicit");
        assert_eq!(resolve_working_dir(Some(explicit.as_path()), &config, Path::new("/fallback")), explicit);
    }

    #[test]
    fn test_saved_dir_used_when_dot_or_missing() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE_NAME);
        let saved = dir.path().join("saved");
        fs::create_dir(&saved).unwrap();
        Settings { working_dir: saved.clone() }.save(&config).unwrap();

        assert_eq!(resolve_working_dir(Some(Path::new(".")), &config, dir.path()), saved);
        assert_eq!(resolve_working_dir(None, &config, dir.path()), saved);
    }

    #[test]
    fn test_stale_saved_dir_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE_NAME);
        Settings { working_dir: dir.path().join("gone") }.save(&config).unwrap();

        assert_eq!(resolve_working_dir(None, &config, dir.path()), dir.path());
    }

    #[test]
    fn test_default_locations_start_here() {
        let options = default_locations(Path::new("/opt/tool"), Some(Path::new("/home/me")));
        assert_eq!(options[0].1, PathBuf::from("/opt/tool"));
        assert!(options.len() >= 2);
        assert!(options[1..].iter().all(|(_, p)| p.ends_with(SUGGESTED_FOLDER)));
    }

    #[test]
    fn test_interactive_setup_custom_path() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE_NAME);
        let target = dir.path().join("decks");

        let custom = default_locations(dir.path(), home_dir().as_deref()).len() + 1;
        let answers = format!("abc\n99\n{}\n\n{}\n{}\n", custom, custom, target.display());
        let mut input = Cursor::new(answers);
        let mut output = Vec::new();

        let chosen = interactive_setup(&mut input, &mut output, dir.path(), &config).unwrap();

        assert_eq!(chosen, Some(target.clone()));
        assert!(target.join("input").is_dir());
        assert!(target.join("processed").is_dir());
        assert!(target.join("output").is_dir());
        assert_eq!(Settings::load(&config), Some(Settings { working_dir: target }));

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Please enter a number between 1 and"));
        assert!(transcript.contains("No path entered. Please try again."));
    }

    #[test]
    fn test_interactive_setup_cancelled_on_eof() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE_NAME);
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(interactive_setup(&mut input, &mut output, dir.path(), &config).unwrap(), None);
        assert!(!config.exists());
    }
}
