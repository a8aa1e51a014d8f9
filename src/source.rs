//! Corpus collection: which files of a project get analyzed.
//!
//! Only `.java` files are taken. Files under a directory whose name ends in
//! `test` are left out, as is user-interface code (JavaFX, Swing, AWT),
//! whose generated layouts and listener wiring drown real findings.

use std::fs;
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::SourceOptions;

/// One file to analyze, addressed by its path relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: String,
    pub content: String,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

lazy_static! {
    static ref GUI_IMPORT: Regex =
        Regex::new(r"import\s+(static\s+)?(javafx|javax\.swing|java\.awt)\.").unwrap();
    static ref GUI_SUPERCLASS: Regex = Regex::new(
        r"extends\s+(Application|(javax\.swing\.)?J(Frame|Dialog|Panel|Applet|Window))\b"
    )
    .unwrap();
}

/// Lowercase fragments that mark JavaFX code.
static JAVAFX_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "javafx.", "fxmlloader", "stage.show", "scene(", "primarystage", "setscene(",
    "getscene(", "fxml", "borderpane", "anchorpane", "stackpane", "gridpane",
    "flowpane", "tilepane", "hbox", "vbox", "imageview", "tableview", "listview",
    "treeview", "scrollpane", "splitpane", "tabpane", "accordion", "titledpane",
    "controller", "initialize()", "observable", "property<",
};

/// Lowercase fragments that mark Swing/AWT code.
static SWING_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "javax.swing.", "java.awt.", "jframe", "jdialog", "jpanel", "jbutton", "jlabel",
    "jtextfield", "jtextarea", "jcombobox", "jlist", "jtable", "jtree", "jmenubar",
    "jtoolbar", "jscrollpane", "jsplitpane", "jtabbedpane", "jslider", "jspinner",
    "jprogressbar", "jcheckbox", "jradiobutton", "windowbuilder",
    "setdefaultcloseoperation", "setcontentpane", "getcontentpane", "setvisible",
    "pack()", "setbounds", "setlocation", "setsize", "addactionlistener",
    "actionlistener", "mouselistener", "keylistener", "windowlistener",
};

/// Whether `content` looks like JavaFX, Swing or AWT code.
pub fn is_gui_code(content: &str) -> bool {
    if GUI_IMPORT.is_match(content) || content.contains("@FXML") {
        return true;
    }
    if GUI_SUPERCLASS.is_match(content) {
        return true;
    }
    let lower = content.to_lowercase();
    JAVAFX_KEYWORDS
        .iter()
        .chain(SWING_KEYWORDS.iter())
        .any(|keyword| lower.contains(keyword))
}

/// Whether any directory of `path` ends in `test`, e.g. `src/test/` or
/// `integrationtest/`.
pub fn in_test_dir(path: &str) -> bool {
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.pop();
    parts
        .iter()
        .any(|dir| dir.to_ascii_lowercase().ends_with("test"))
}

fn build_excludes(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid glob {:?}", pattern))?);
    }
    Ok(builder.build()?)
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = if rel.as_os_str().is_empty() {
        path.file_name().map(Path::new).unwrap_or(path)
    } else {
        rel
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect the Java files under `root` (or `root` itself when it is a file),
/// in path order.
pub fn collect(root: &Path, options: &SourceOptions) -> anyhow::Result<Vec<SourceEntry>> {
    let excludes = build_excludes(&options.excluded_paths)?;
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("java") {
            continue;
        }

        let rel = relative_path(root, path);
        if excludes.is_match(&rel) {
            tracing::debug!(file = %rel, "excluded by pattern");
            continue;
        }
        if options.skip_test_dirs && in_test_dir(&rel) {
            tracing::debug!(file = %rel, "skipped test directory");
            continue;
        }

        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let Ok(content) = String::from_utf8(bytes) else {
            tracing::debug!(file = %rel, "skipped non-UTF-8 file");
            continue;
        };
        if options.skip_gui_code && is_gui_code(&content) {
            tracing::debug!(file = %rel, "skipped user-interface code");
            continue;
        }

        entries.push(SourceEntry::new(rel, content));
    }

    Ok(entries)
}
