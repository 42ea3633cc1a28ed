//! Keeps `tests/unit/` an exact mirror of `src/` and makes sure every mirrored file is compiled

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SOURCE_ROOT: &str = "src";
    const UNIT_ROOT: &str = "tests/unit";

    /// Rust files below `root`, relative to it, skipping module organization files
    fn module_files(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let is_rust = path.extension().is_some_and(|ext| ext == "rs");
                let is_organizational = path
                    .file_name()
                    .is_some_and(|name| name == "mod.rs" || name == "lib.rs" || name == "main.rs");
                if is_rust && !is_organizational {
                    if let Ok(relative) = path.strip_prefix(root) {
                        found.insert(relative.to_path_buf());
                    }
                }
            }
        }
        Ok(found)
    }

    fn listing(paths: &[&PathBuf], prefix: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}/{}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests every source module has a unit test file and vice versa
    #[test]
    fn test_unit_tree_mirrors_source_tree() {
        let sources = module_files(Path::new(SOURCE_ROOT)).unwrap();
        let units = module_files(Path::new(UNIT_ROOT)).unwrap();

        let untested: Vec<_> = sources.difference(&units).collect();
        assert!(
            untested.is_empty(),
            "source modules without unit tests:\n{}",
            listing(&untested, SOURCE_ROOT)
        );

        let orphaned: Vec<_> = units.difference(&sources).collect();
        assert!(
            orphaned.is_empty(),
            "unit tests without a source module:\n{}",
            listing(&orphaned, UNIT_ROOT)
        );
    }

    // Tests each unit test file is declared by its parent module so it gets compiled
    #[test]
    fn test_unit_files_are_declared() {
        let units = module_files(Path::new(UNIT_ROOT)).unwrap();
        let mut undeclared = Vec::new();

        for unit in &units {
            let parent = Path::new(UNIT_ROOT).join(unit.parent().unwrap_or(Path::new("")));
            let declarations = fs::read_to_string(parent.join("mod.rs")).unwrap_or_default();
            let stem = unit.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
            if !declarations.lines().any(|line| line.trim() == format!("mod {stem};")) {
                undeclared.push(unit);
            }
        }

        assert!(
            undeclared.is_empty(),
            "unit test files missing a `mod` declaration:\n{}",
            listing(&undeclared, UNIT_ROOT)
        );
    }

    // Tests no test file is left without a test function
    #[test]
    fn test_test_files_contain_tests() {
        let mut empty = Vec::new();
        for root in [UNIT_ROOT, "tests"] {
            let files: BTreeSet<PathBuf> = if root == "tests" {
                fs::read_dir(root)
                    .unwrap()
                    .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                    .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
                    .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
                    .collect()
            } else {
                module_files(Path::new(root)).unwrap()
            };

            for file in files {
                let content = fs::read_to_string(Path::new(root).join(&file)).unwrap();
                if !content.contains("#[test]") {
                    empty.push(Path::new(root).join(file));
                }
            }
        }

        assert!(
            empty.is_empty(),
            "test files without any #[test] function:\n{}",
            empty
                .iter()
                .map(|path| format!("  - {}", path.display()))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}
