//! 实验结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 同一个体模上, 合并与平均两种约定的特征差异.
#[derive(Clone, Debug)]
pub struct Gap {
    /// 比较过的特征个数 (两者都不是 `NaN`).
    pub compared: usize,

    /// 只有一方为 `NaN` 的特征个数.
    pub nan_mismatch: usize,

    /// 相对差异最大的特征及其相对差异.
    pub largest: Option<(String, f64)>,
}

#[inline]
fn f64_to_display(f: Option<f64>) -> String {
    match f {
        Some(f) => format!("{f:.6}"),
        None => "/".to_string(),
    }
}

/// 将 `profile` 的结果写进 `w` 中.
fn describe_profile<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Extractions: {}", p.runs())?;
    writeln!(w, "{S4}Extraction total time: {} us", p.extract_time_us())?;
    writeln!(
        w,
        "{S4}Extraction average time: {} us",
        f64_to_display(p.avg_extract_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.real_time_us())?;
    let t = p.most_time_consuming().map(|d| d.as_micros() as f64);
    write!(w, "{S4}Most time-consuming extraction costs {} us", f64_to_display(t))?;
    Ok(())
}

/// 将 `gap` 的结果写进 `w` 中.
fn describe_gap<W: Write>(name: &str, g: &Gap, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    writeln!(w, "Phantom `{name}` (merge vs average):")?;
    writeln!(w, "{S4}Compared features: {}", g.compared)?;
    writeln!(w, "{S4}NaN mismatches: {}", g.nan_mismatch)?;
    match &g.largest {
        Some((key, d)) => write!(w, "{S4}Largest relative gap: {key} ({d:.6})")?,
        None => write!(w, "{S4}Largest relative gap: /")?,
    }
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    profiles: Vec<(&'static str, Profile)>,
    gaps: Vec<(&'static str, Gap)>,
}

impl AblationResult {
    pub fn new(profiles: Vec<(&'static str, Profile)>, gaps: Vec<(&'static str, Gap)>) -> Self {
        Self { profiles, gaps }
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        utils::sep_to(&mut out)?;
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.profiles.iter() {
            describe_profile(key, profile, &mut buf)?;
            writeln!(out, "{}", String::from_utf8_lossy(&buf))?;
            buf.clear();
            utils::sep_to(&mut out)?;
        }
        for (key, gap) in self.gaps.iter() {
            describe_gap(key, gap, &mut buf)?;
            writeln!(out, "{}", String::from_utf8_lossy(&buf))?;
            buf.clear();
            utils::sep_to(&mut out)?;
        }
        Ok(())
    }
}
