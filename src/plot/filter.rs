use regex::Regex;

/// Process name the collector is normally pointed at.
pub const DEFAULT_PROCESS: &str = "mserver5";

/// Decides which process samples get a track.
#[derive(Clone, Debug)]
pub enum ProcessFilter {
    /// Exact process names.
    Names(Vec<String>),
    /// Regular expression searched anywhere in the process name.
    Pattern(Regex),
}

impl ProcessFilter {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProcessFilter::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(ProcessFilter::Pattern)
    }

    pub fn matches(&self, pname: &str) -> bool {
        match self {
            ProcessFilter::Names(names) => names.iter().any(|n| n == pname),
            ProcessFilter::Pattern(re) => re.is_match(pname),
        }
    }
}

impl Default for ProcessFilter {
    fn default() -> Self {
        ProcessFilter::names([DEFAULT_PROCESS])
    }
}
