//! Project assembly.
//!
//! Turns a process description into a ready-to-serve Jekyll project:
//!
//! 1. Load and enrich the process description
//! 2. Scaffold the output directory if it does not exist yet
//! 3. Recreate and fill one `_<collection>` folder per collection
//! 4. Write the site configuration with the activity graph
//! 5. Copy bundled statics
//! 6. Stage uploads
//!
//! Loading comes first so a broken description never leaves a freshly
//! scaffolded project behind. Later failures abort without cleanup.

pub mod fs;
pub mod jekyll_config;
pub mod scaffold;

use std::path::Path;

use crate::config::{BuildOptions, SiteSettings};
use crate::enrich::enrich;
use crate::error::{ProcsiteError, SiteError};
use crate::graph::ActivityGraph;
use crate::model;
use crate::render::Renderer;

/// Outcome of a successful build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Collections written, in document order.
    pub collections: Vec<String>,

    /// Markdown artifacts written across all collections.
    pub records_written: usize,

    /// Reverse references added by enrichment.
    pub links_added: usize,

    /// Files copied from the statics directory.
    pub statics_copied: usize,

    /// Files staged into the uploads folder.
    pub uploads_staged: usize,

    /// Whether the site generator ran for this build.
    pub scaffolded: bool,
}

/// Builds the project described by `options` from the process description
/// at `process`.
///
/// # Errors
///
/// Returns the first load, render, scaffold or filesystem error. Output
/// written before the failure is left in place.
pub fn build(process: &Path, options: &BuildOptions) -> Result<BuildSummary, ProcsiteError> {
    let settings = &options.settings;
    let mut summary = BuildSummary::default();

    let mut document = model::load(process)?;
    summary.links_added = enrich(&mut document, &settings.schema.relations).links_added;

    // Reject a broken graph before touching the output directory.
    let graph = ActivityGraph::build(&document)?;
    for cycle in graph.cycles() {
        tracing::warn!(activities = %cycle.join(" -> "), "predecessor cycle");
    }

    summary.scaffolded = prepare_output(options)?;

    let renderer = Renderer::new(&document, &settings.schema);
    for collection in document.collections.keys() {
        let dir = options.output.join(format!("_{collection}"));
        fs::recreate_dir(&dir)?;
        let written = renderer.write_collection(collection, &dir)?;
        tracing::info!(collection = %collection, records = written, "collection written");

        summary.collections.push(collection.clone());
        summary.records_written += written;
    }

    let config_path = options.output.join(&settings.config_file);
    fs::delete_file(&config_path)?;
    std::fs::write(
        &config_path,
        jekyll_config::render_jekyll_config(&document, &graph),
    )
    .map_err(|e| SiteError::io(&config_path, e))?;
    tracing::info!(path = %config_path.display(), "site configuration written");

    summary.statics_copied = copy_statics(&options.statics_dir, &options.output, settings)?;

    let uploads_dir = options.output.join(&settings.uploads_folder);
    fs::recreate_dir(&uploads_dir)?;
    summary.uploads_staged = fs::copy_uploads(&options.uploads, &uploads_dir)?;

    Ok(summary)
}

/// Makes sure the output directory exists. Returns whether the generator
/// ran.
fn prepare_output(options: &BuildOptions) -> Result<bool, SiteError> {
    if options.output.exists() {
        tracing::debug!(path = %options.output.display(), "output directory exists, not scaffolding");
        return Ok(false);
    }

    if !options.scaffold {
        std::fs::create_dir_all(&options.output)
            .map_err(|e| SiteError::io(&options.output, e))?;
        return Ok(false);
    }

    scaffold::scaffold(&options.generator, &options.output)?;
    scaffold::remove_placeholders(&options.output, &options.settings.placeholder_files)?;
    Ok(true)
}

/// Copies the bundled pages and folders into the project. Returns the
/// number of files copied.
///
/// # Errors
///
/// Returns `SiteError::MissingStatics` if `statics_dir` is not a directory,
/// and `SiteError::Io` if any copy fails.
pub fn copy_statics(
    statics_dir: &Path,
    output: &Path,
    settings: &SiteSettings,
) -> Result<usize, SiteError> {
    if !statics_dir.is_dir() {
        return Err(SiteError::MissingStatics {
            path: statics_dir.to_path_buf(),
        });
    }

    fs::recreate_dir(&output.join(&settings.assets_folder))?;

    let mut copied = 0;
    for file in &settings.static_files {
        fs::copy_file(&statics_dir.join(file), &output.join(file))?;
        copied += 1;
    }

    for folder in &settings.static_folders {
        let target = output.join(folder);
        fs::recreate_dir(&target)?;
        copied += fs::copy_tree(&statics_dir.join(folder), &target)?;
    }

    tracing::info!(files = copied, from = %statics_dir.display(), "statics copied");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::path::PathBuf;

    const PROCESS: &str = r"
process_name: Scrum
process_description: Lightweight framework
roles:
  dev:
    name: Developer
activities:
  plan:
    name: Sprint planning
    participant_roles: [dev]
  review:
    name: Sprint review
    predecessor: plan
";

    fn statics(root: &Path) -> PathBuf {
        let dir = root.join("statics");
        let settings = SiteSettings::default();
        std::fs::create_dir_all(&dir).unwrap();
        for file in &settings.static_files {
            std::fs::write(dir.join(file), file).unwrap();
        }
        for folder in &settings.static_folders {
            std::fs::create_dir_all(dir.join(folder)).unwrap();
            std::fs::write(dir.join(folder).join("part.txt"), folder).unwrap();
        }
        dir
    }

    fn options(root: &Path) -> BuildOptions {
        let mut options = BuildOptions::new(root.join("site"));
        options.statics_dir = statics(root);
        options.scaffold = false;
        options
    }

    fn process(root: &Path, content: &str) -> PathBuf {
        let path = root.join("process.yml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_build_writes_project() {
        let tmp = tempfile::tempdir().unwrap();
        let options = options(tmp.path());
        let summary = build(&process(tmp.path(), PROCESS), &options).unwrap();

        assert_eq!(summary.collections, ["roles", "activities"]);
        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.links_added, 1);
        assert_eq!(summary.statics_copied, 12);
        assert!(!summary.scaffolded);

        let site = &options.output;
        let dev = std::fs::read_to_string(site.join("_roles/dev.md")).unwrap();
        assert!(dev.contains("participated_activities:\n  plan: \"Sprint planning\""));
        assert!(site.join("_config.yml").is_file());
        assert!(site.join("workflow.html").is_file());
        assert!(site.join("assets/css/part.txt").is_file());
        assert!(site.join("uploads").is_dir());
    }

    #[test]
    fn test_rebuild_removes_stale_records() {
        let tmp = tempfile::tempdir().unwrap();
        let options = options(tmp.path());
        let path = process(tmp.path(), PROCESS);
        build(&path, &options).unwrap();

        std::fs::write(options.output.join("_roles/retired.md"), "stale").unwrap();
        build(&path, &options).unwrap();

        assert!(!options.output.join("_roles/retired.md").exists());
        assert!(options.output.join("_roles/dev.md").exists());
    }

    #[test]
    fn test_missing_statics() {
        let tmp = tempfile::tempdir().unwrap();
        let mut options = options(tmp.path());
        options.statics_dir = tmp.path().join("nowhere");
        let err = build(&process(tmp.path(), PROCESS), &options).unwrap_err();
        assert!(matches!(err, ProcsiteError::Site(SiteError::MissingStatics { .. })));
    }

    #[test]
    fn test_load_failure_leaves_output_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let options = options(tmp.path());
        let err = build(&process(tmp.path(), "process_name: only\n"), &options).unwrap_err();
        assert!(matches!(err, ProcsiteError::Load(_)));
        assert!(!options.output.exists());
    }

    #[test]
    fn test_collection_name_cannot_escape_output() {
        let tmp = tempfile::tempdir().unwrap();
        let victim = tmp.path().join("victim");
        std::fs::create_dir_all(&victim).unwrap();
        std::fs::write(victim.join("precious.txt"), "keep").unwrap();

        let options = options(tmp.path());
        let content = format!("{PROCESS}\"x/../../victim\":\n  r1:\n    name: R\n");
        let path = process(tmp.path(), &content);
        for _ in 0..2 {
            let err = build(&path, &options).unwrap_err();
            assert!(matches!(err, ProcsiteError::Load(_)));
        }

        assert!(victim.join("precious.txt").is_file());
        assert!(!victim.join("r1.md").exists());
        assert!(!options.output.exists());
    }

    #[test]
    fn test_unresolved_reference_fails_build() {
        let tmp = tempfile::tempdir().unwrap();
        let options = options(tmp.path());
        let content = PROCESS.replace("[dev]", "[devs]");
        let err = build(&process(tmp.path(), &content), &options).unwrap_err();
        assert!(matches!(err, ProcsiteError::Render(RenderError::Resolution { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_scaffold_runs_generator_and_removes_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let mut options = options(tmp.path());
        options.scaffold = true;
        options.generator = vec!["mkdir".to_string()];
        let summary = build(&process(tmp.path(), PROCESS), &options).unwrap();
        assert!(summary.scaffolded);
        assert!(options.output.join("_activities/review.md").is_file());
    }

    #[test]
    fn test_uploads_staged() {
        let tmp = tempfile::tempdir().unwrap();
        let mut options = options(tmp.path());
        let upload = tmp.path().join("handbook.pdf");
        std::fs::write(&upload, "pdf").unwrap();
        options.uploads = vec![upload];

        let summary = build(&process(tmp.path(), PROCESS), &options).unwrap();
        assert_eq!(summary.uploads_staged, 1);
        assert!(options.output.join("uploads/handbook.pdf").is_file());
    }
}
