//! Parallel script loading into a registry.

use implindex_core::{load_script, ImplementorIndex, ImplementorRegistry};
use log::{info, warn};
use std::fmt::Write as _;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Counts from one loading pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub submitted: usize,
    pub failed: usize,
}

/// Loads every script across one worker per available core and submits the
/// results.
///
/// Failures are logged per file and counted; they never abort other loaders.
pub fn load_into(registry: &ImplementorRegistry, root: &Path, scripts: &[PathBuf]) -> LoadSummary {
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    load_with_workers(registry, root, scripts, workers)
}

/// Loads `scripts` on at most `max_workers` scoped threads, each taking one
/// contiguous chunk.
pub fn load_with_workers(
    registry: &ImplementorRegistry,
    root: &Path,
    scripts: &[PathBuf],
    max_workers: usize,
) -> LoadSummary {
    let workers = max_workers.clamp(1, scripts.len().max(1));
    let per_worker = scripts.len().div_ceil(workers).max(1);

    let submitted: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = scripts
            .chunks(per_worker)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .filter(|path| load_one(registry, root, path))
                        .count()
                })
            })
            .collect();
        // A panicked worker counts its whole chunk as failed.
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(0))
            .sum()
    });

    let summary = LoadSummary {
        submitted,
        failed: scripts.len() - submitted,
    };
    info!(
        "event=load_finished module=cli status={} workers={} submitted={} failed={}",
        if summary.failed == 0 { "ok" } else { "partial" },
        workers,
        summary.submitted,
        summary.failed
    );
    summary
}

fn load_one(registry: &ImplementorRegistry, root: &Path, path: &Path) -> bool {
    let fragment = match load_script(root, path) {
        Ok(fragment) => fragment,
        Err(err) => {
            warn!(
                "event=script_load_failed module=cli status=error path={} reason={}",
                path.display(),
                err
            );
            return false;
        }
    };
    match registry.submit(fragment) {
        Ok(_) => true,
        Err(err) => {
            warn!(
                "event=script_submit_failed module=cli status=error path={} reason={}",
                path.display(),
                err
            );
            false
        }
    }
}

/// Renders the merged index as indented plain text.
pub fn render_text(index: &ImplementorIndex) -> String {
    let mut out = String::new();
    for symbol in index.symbols() {
        let _ = writeln!(out, "{symbol}");
        for descriptor in index.descriptors(symbol).unwrap_or_default() {
            let _ = writeln!(out, "  {descriptor}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{load_into, load_with_workers, render_text, LoadSummary};
    use implindex_core::{
        discover_scripts, Descriptor, Fragment, ImplementorRegistry, MergePolicy, SharedIndex,
    };
    use std::fs;

    #[test]
    fn counts_failed_scripts_without_aborting_others() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("core/default")).expect("mkdir");
        fs::write(
            root.join("core/default/trait.Default.js"),
            r#"var implementors = {"oxc_ast":[["impl Default for Span"]]};"#,
        )
        .expect("write good script");
        fs::write(root.join("core/default/trait.Broken.js"), "oops").expect("write bad script");

        let registry = ImplementorRegistry::new();
        let scripts = discover_scripts(root).expect("discover");
        let summary = load_into(&registry, root, &scripts);
        assert_eq!(
            summary,
            LoadSummary {
                submitted: 1,
                failed: 1
            }
        );
        assert_eq!(registry.pending_len(), 1);
    }

    #[test]
    fn more_scripts_than_workers_are_all_submitted() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("core/marker")).expect("mkdir");
        for n in 0..37 {
            fs::write(
                root.join(format!("core/marker/trait.Marker{n}.js")),
                format!(r#"var implementors = {{"crate_{n}":[["impl Marker{n} for Foo"]]}};"#),
            )
            .expect("write script");
        }

        let registry = ImplementorRegistry::new();
        let scripts = discover_scripts(root).expect("discover");
        assert_eq!(scripts.len(), 37);
        let summary = load_with_workers(&registry, root, &scripts, 4);
        assert_eq!(
            summary,
            LoadSummary {
                submitted: 37,
                failed: 0
            }
        );
        assert_eq!(registry.pending_len(), 37);
    }

    #[test]
    fn renders_symbols_with_indented_descriptors() {
        let registry = ImplementorRegistry::new();
        let index = SharedIndex::new(MergePolicy::Append);
        registry.attach(index.clone()).expect("attach");
        registry
            .submit(
                Fragment::new()
                    .with_symbol("Bar", ["impl B for Bar", "impl C for Bar"])
                    .with_symbol("Baz", Vec::<Descriptor>::new()),
            )
            .expect("submit");

        assert_eq!(
            render_text(&index.snapshot()),
            "Bar\n  impl B for Bar\n  impl C for Bar\nBaz\n"
        );
    }
}
