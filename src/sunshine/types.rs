use serde::{Deserialize, Serialize};

/// A regular Sunshine application: one command, run until it exits
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SunshineApp {
    pub name: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub working_dir: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub detached: bool,
    #[serde(default)]
    pub elevated: bool,
    #[serde(default = "default_true")]
    pub exit_on_close: bool,
}

fn default_true() -> bool {
    true
}

impl SunshineApp {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>, working_dir: impl Into<String>) -> Self {
        SunshineApp {
            name: name.into(),
            output: String::new(),
            cmd: cmd.into(),
            working_dir: working_dir.into(),
            image_path: String::new(),
            detached: false,
            elevated: false,
            exit_on_close: true,
        }
    }

    pub fn with_image(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }
}

/// An application that only fires detached commands (e.g. a reboot)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DetachedApp {
    pub name: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub cmd: Vec<String>,
    #[serde(default)]
    pub detached: Vec<String>,
    #[serde(default)]
    pub auto_detach: bool,
    #[serde(default)]
    pub wait_all: bool,
    #[serde(default)]
    pub exit_timeout: u32,
    #[serde(default)]
    pub exclude_global_prep_cmd: bool,
    #[serde(default)]
    pub image_path: String,
}

/// Anything this tool writes into `apps.json`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum AppEntry {
    App(SunshineApp),
    Detached(DetachedApp),
}

impl AppEntry {
    pub fn name(&self) -> &str {
        match self {
            AppEntry::App(app) => &app.name,
            AppEntry::Detached(app) => &app.name,
        }
    }
}

impl From<SunshineApp> for AppEntry {
    fn from(app: SunshineApp) -> Self {
        AppEntry::App(app)
    }
}

impl From<DetachedApp> for AppEntry {
    fn from(app: DetachedApp) -> Self {
        AppEntry::Detached(app)
    }
}
