/*
 * Input taint seeding
 *
 * Line-local regex sources that mark variables as holding external input:
 * - scanf-family targets (`&x`)
 * - numeric conversions of strings (`x = atoi(...)`)
 * - command line arguments (`p = argv[1]`)
 * - read buffers (`fgets(buf, ...)`, `read(fd, buf, n)`)
 *
 * No data flow: a name is tainted for the whole file once it matches.
 */

use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashSet;

/// Where tainted names come from
#[derive(Debug)]
pub struct TaintSource {
    pub description: &'static str,
    regex: Regex,
    /// For scanf-style sources the capture is an argument list; targets are
    /// the `&name` arguments inside it
    address_targets: bool,
}

impl TaintSource {
    fn new(pattern: &str, description: &'static str, address_targets: bool) -> Self {
        Self {
            description,
            regex: Regex::new(pattern).expect("taint source pattern must compile"),
            address_targets,
        }
    }

    /// Names this source taints on `line`
    pub fn tainted_names<'l>(&self, line: &'l str) -> Vec<&'l str> {
        let mut names = Vec::new();
        for caps in self.regex.captures_iter(line) {
            let Some(capture) = caps.get(1) else {
                continue;
            };
            if self.address_targets {
                names.extend(
                    ADDRESS_OF
                        .captures_iter(capture.as_str())
                        .filter_map(|c| c.get(1))
                        .map(|m| m.as_str()),
                );
            } else {
                names.push(capture.as_str());
            }
        }
        names
    }
}

lazy_static! {
    static ref ADDRESS_OF: Regex =
        Regex::new(r"&\s*([A-Za-z_]\w*)").expect("address-of pattern must compile");

    /// Built-in taint sources
    pub static ref TAINT_SOURCES: Vec<TaintSource> = vec![
        TaintSource::new(r"\b(?:[fs]?scanf|vscanf)\s*\(([^;]*)", "scanf input", true),
        TaintSource::new(
            r"([A-Za-z_]\w*)\s*=\s*(?:atoi|atol|atoll|strtol|strtoul|strtoll)\s*\(",
            "string to number conversion",
            false,
        ),
        TaintSource::new(r"([A-Za-z_]\w*)\s*=\s*argv\b", "command line argument", false),
        TaintSource::new(r"\b(?:fgets|fread|gets)\s*\(\s*([A-Za-z_]\w*)", "file input", false),
        TaintSource::new(r"\bread\s*\(\s*\w+\s*,\s*([A-Za-z_]\w*)", "descriptor read", false),
    ];
}

/// Collect every tainted name in `lines`
pub fn collect_tainted<'l>(lines: &[&'l str]) -> FxHashSet<&'l str> {
    let mut tainted = FxHashSet::default();
    for line in lines {
        for source in TAINT_SOURCES.iter() {
            tainted.extend(source.tainted_names(line));
        }
    }
    tainted
}
