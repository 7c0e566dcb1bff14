//! Loads the site [`Config`] from an optional `kerbside.yaml` project file.
//! Every field of the project file is optional, and a project without one
//! builds with the defaults, rooted at the project directory.

use crate::url::relative_url;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "kerbside.yaml";

#[derive(Deserialize)]
struct Title(String);
impl Default for Title {
    fn default() -> Self {
        Title("Parked Badly in Scotland".to_owned())
    }
}

#[derive(Deserialize)]
struct ImagesDirectory(PathBuf);
impl Default for ImagesDirectory {
    fn default() -> Self {
        ImagesDirectory(PathBuf::from("sightings"))
    }
}

/// The author credited in the feed.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default)]
    title: Title,

    #[serde(default)]
    images_directory: ImagesDirectory,

    #[serde(default)]
    images_url: Option<String>,

    #[serde(default)]
    output_directory: Option<PathBuf>,

    #[serde(default)]
    split_previous: bool,

    #[serde(default)]
    site_url: Option<Url>,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default)]
    theme_directory: Option<PathBuf>,
}

/// Settings given on the command line. These take precedence over the
/// project file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub output_directory: Option<PathBuf>,
    pub split_previous: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// The site title.
    pub title: String,

    /// The directory scanned for sightings.
    pub images_source_directory: PathBuf,

    /// The URL prefix used to reference images from the output pages.
    pub images_url: String,

    /// The directory the pages (and feed) are written to.
    pub output_directory: PathBuf,

    /// Whether the gallery is written to its own page.
    pub split_previous: bool,

    /// The public URL of the output directory, always ending in `/`. The
    /// feed is only written when this is set.
    pub site_url: Option<Url>,

    /// The feed author.
    pub author: Option<Author>,

    /// A theme directory replacing the built-in theme.
    pub theme_directory: Option<PathBuf>,
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its ancestors,
    /// and loads the first one found. If there is none, the defaults apply
    /// with `dir` as the project root.
    pub fn from_directory(dir: &Path, overrides: &Overrides) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.exists() {
                return Config::from_project_file(&path, overrides)
                    .map_err(|e| anyhow!("Loading configuration: {:?}", e));
            }
        }
        Config::from_project(Project::default(), &dir, overrides)
    }

    /// Loads the configuration from a project file. Relative paths in the
    /// file are resolved against the file's directory.
    pub fn from_project_file(path: &Path, overrides: &Overrides) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_str(&contents)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Config::from_project(project, project_root, overrides),
        }
    }

    fn from_project(project: Project, project_root: &Path, overrides: &Overrides) -> Result<Config> {
        let images_source_directory = project_root.join(project.images_directory.0);
        let output_directory = match &overrides.output_directory {
            Some(dir) => dir.to_owned(),
            None => project_root.join(project.output_directory.unwrap_or_default()),
        };
        let images_url = match project.images_url {
            Some(images_url) => images_url,
            None => relative_path(&output_directory, &images_source_directory)
                .as_deref()
                .and_then(relative_url)
                .ok_or_else(|| {
                    anyhow!(
                        "Can't reference images in `{}` from `{}`; set `images_url`",
                        images_source_directory.display(),
                        output_directory.display()
                    )
                })?,
        };

        Ok(Config {
            title: project.title.0,
            images_source_directory,
            images_url,
            output_directory,
            split_previous: project.split_previous || overrides.split_previous,
            site_url: project.site_url.map(with_trailing_slash),
            author: project.author,
            theme_directory: project
                .theme_directory
                .map(|relpath| project_root.join(relpath)),
        })
    }
}

// `Url::join` replaces the last path segment unless the base ends in a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Resolves `.` and `..` components without touching the filesystem. A `..`
/// at the root stays at the root; leading `..`s of a relative path are kept.
fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last().copied() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }
    components
}

/// Computes the path of `to` relative to the directory `from`, lexically.
/// Returns [`None`] if `from` still climbs out of a relative path once both
/// are normalized.
fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
    let from = normalize(from);
    let to = normalize(to);

    let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();
    let mut relative = PathBuf::new();
    for component in &from[common..] {
        match component {
            Component::Normal(_) => relative.push(".."),
            _ => return None,
        }
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}
