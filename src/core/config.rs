use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for feis-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every section is optional. Without a config file the defaults reproduce the
/// FEIS release layout: `meson.build` at the root, `build/FEIS.exe`, `assets/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub bump: BumpConfig,
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub wrap: WrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Prefix of the bundle directory and archive (`FEIS-1.4.0.zip`)
  #[serde(default = "default_project_name")]
  pub name: String,
}

fn default_project_name() -> String {
  "FEIS".to_string()
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: default_project_name(),
    }
  }
}

/// Paths of the external tools, resolved through PATH when not absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_git")]
  pub git: PathBuf,
  #[serde(default = "default_meson")]
  pub meson: PathBuf,
  /// Interpreter for the dependency-copy script
  #[serde(default = "default_python")]
  pub python: PathBuf,
}

fn default_git() -> PathBuf {
  PathBuf::from("git")
}

fn default_meson() -> PathBuf {
  PathBuf::from("meson")
}

fn default_python() -> PathBuf {
  PathBuf::from("python")
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      git: default_git(),
      meson: default_meson(),
      python: default_python(),
    }
  }
}

/// Version bump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BumpConfig {
  /// Files whose version field is rewritten
  #[serde(default = "default_targets")]
  pub targets: Vec<MetadataTarget>,

  /// Commit message; `{version}` is replaced with the rendered version
  #[serde(default = "default_commit_message")]
  pub commit_message: String,

  /// Tag name is `<tag_prefix><version>`
  #[serde(default = "default_tag_prefix")]
  pub tag_prefix: String,

  /// Create an annotated tag instead of a lightweight one
  #[serde(default)]
  pub annotate: bool,

  /// Rewrite metadata but skip staging, commit and tag
  #[serde(default)]
  pub dry_run: bool,
}

fn default_targets() -> Vec<MetadataTarget> {
  vec![MetadataTarget::Meson {
    path: PathBuf::from("meson.build"),
  }]
}

fn default_commit_message() -> String {
  "bump to v{version}".to_string()
}

fn default_tag_prefix() -> String {
  "v".to_string()
}

impl Default for BumpConfig {
  fn default() -> Self {
    Self {
      targets: default_targets(),
      commit_message: default_commit_message(),
      tag_prefix: default_tag_prefix(),
      annotate: false,
      dry_run: false,
    }
  }
}

/// A metadata file carrying the project version
///
/// ```toml
/// [[bump.targets]]
/// kind = "meson"
/// path = "meson.build"
///
/// [[bump.targets]]
/// kind = "control"
/// path = "packaging/debian/control"
/// key = "Version:"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetadataTarget {
  /// Meson project descriptor, rewritten through `meson rewrite`
  Meson { path: PathBuf },
  /// Line-oriented control file (`Version: 1.2.3`)
  Control {
    path: PathBuf,
    #[serde(default = "default_control_key")]
    key: String,
  },
  /// Cargo manifest, edited losslessly
  Cargo { path: PathBuf },
}

fn default_control_key() -> String {
  "Version:".to_string()
}

impl MetadataTarget {
  /// Path of the target, relative to the project root
  pub fn path(&self) -> &Path {
    match self {
      MetadataTarget::Meson { path } | MetadataTarget::Control { path, .. } | MetadataTarget::Cargo { path } => path,
    }
  }

  /// Short label for output
  pub fn kind(&self) -> &'static str {
    match self {
      MetadataTarget::Meson { .. } => "meson",
      MetadataTarget::Control { .. } => "control",
      MetadataTarget::Cargo { .. } => "cargo",
    }
  }
}

/// Release packaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Directory holding the compiled binary
  #[serde(default = "default_build_dir")]
  pub build_dir: PathBuf,

  /// File name of the compiled binary inside `build_dir`
  #[serde(default = "default_binary")]
  pub binary: String,

  /// Asset tree copied into `<bundle>/assets`
  #[serde(default = "default_assets")]
  pub assets: PathBuf,

  /// Where the bundle directory and archive are created
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  #[serde(default)]
  pub staging: StagingPolicy,

  /// Keep the bundle directory after archiving
  #[serde(default = "default_true")]
  pub keep_staging: bool,

  /// Suffix the archive name with a UTC timestamp
  #[serde(default)]
  pub timestamp: bool,

  /// Write `<archive>.sha256` next to the archive
  #[serde(default = "default_true")]
  pub checksum: bool,

  #[serde(default)]
  pub dependencies: DependencyConfig,
}

fn default_build_dir() -> PathBuf {
  PathBuf::from("build")
}

fn default_binary() -> String {
  "FEIS.exe".to_string()
}

fn default_assets() -> PathBuf {
  PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
  PathBuf::from(".")
}

fn default_true() -> bool {
  true
}

impl Default for PackageConfig {
  fn default() -> Self {
    Self {
      build_dir: default_build_dir(),
      binary: default_binary(),
      assets: default_assets(),
      output_dir: default_output_dir(),
      staging: StagingPolicy::default(),
      keep_staging: true,
      timestamp: false,
      checksum: true,
      dependencies: DependencyConfig::default(),
    }
  }
}

/// What to do with an existing bundle directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingPolicy {
  /// Remove it and start from an empty directory
  #[default]
  Reset,
  /// Copy over it, overlaying existing files
  Reuse,
}

/// Runtime dependency resolution step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyConfig {
  #[serde(default)]
  pub mode: DependencyMode,

  /// Script invoked as `<python> <script> -d <bundle> -f <bundle>/<binary>`
  #[serde(default = "default_dependency_script")]
  pub script: PathBuf,
}

fn default_dependency_script() -> PathBuf {
  PathBuf::from("utils/copy_dependencies.py")
}

impl Default for DependencyConfig {
  fn default() -> Self {
    Self {
      mode: DependencyMode::default(),
      script: default_dependency_script(),
    }
  }
}

/// How a failing dependency-resolution step is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DependencyMode {
  /// Failure aborts packaging
  Strict,
  /// Failure is reported and packaging continues
  #[default]
  Lenient,
  /// The step is not run
  Skip,
}

/// Meson subproject wrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapConfig {
  #[serde(default = "default_subprojects")]
  pub subprojects: PathBuf,

  /// File-name glob selecting the build files to save
  #[serde(default = "default_wrap_pattern")]
  pub pattern: String,
}

fn default_subprojects() -> PathBuf {
  PathBuf::from("subprojects")
}

fn default_wrap_pattern() -> String {
  "*meson*".to_string()
}

impl Default for WrapConfig {
  fn default() -> Self {
    Self {
      subprojects: default_subprojects(),
      pattern: default_wrap_pattern(),
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("release.toml"),
      root.join(".release.toml"),
      root.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the config for a project root
  ///
  /// An explicit path must exist. Without one the search locations are tried and
  /// the defaults are used when none exists.
  pub fn load(root: &Path, explicit: Option<&Path>) -> ReleaseResult<Self> {
    let config_path = match explicit {
      Some(path) => {
        let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        if !path.exists() {
          return Err(ReleaseError::Config(ConfigError::NotFound { path }));
        }
        path
      }
      None => match Self::find_config_path(root) {
        Some(path) => path,
        None => return Ok(Self::default()),
      },
    };

    Self::from_file(&config_path)
  }

  /// Parse and validate a config file
  pub fn from_file(config_path: &Path) -> ReleaseResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> ReleaseResult<Self> {
    let config: ReleaseConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate values serde cannot check
  pub fn validate(&self) -> ReleaseResult<()> {
    if self.project.name.trim().is_empty() {
      return Err(invalid("project.name", "must not be empty"));
    }

    if !self.bump.commit_message.contains("{version}") {
      return Err(invalid("bump.commit_message", "must contain the `{version}` placeholder"));
    }

    let mut seen = std::collections::HashSet::new();
    for target in &self.bump.targets {
      if target.path().as_os_str().is_empty() {
        return Err(invalid("bump.targets.path", "must not be empty"));
      }
      // `./control` and `control` are the same file
      let normalized: PathBuf = target
        .path()
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect();
      if !seen.insert(normalized) {
        return Err(invalid(
          "bump.targets.path",
          &format!("{} is listed more than once", target.path().display()),
        ));
      }
      if let MetadataTarget::Control { key, .. } = target
        && key.trim().is_empty()
      {
        return Err(invalid("bump.targets.key", "must not be empty"));
      }
    }

    if self.package.binary.trim().is_empty() {
      return Err(invalid("package.binary", "must not be empty"));
    }

    if self.wrap.pattern.trim().is_empty() {
      return Err(invalid("wrap.pattern", "must not be empty"));
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> ReleaseError {
  ReleaseError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
