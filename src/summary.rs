/// Turn ordered (count, noun) pairs into a grammatically joined English
/// phrase: `[(1, "touchdown"), (100, "yard")]` → "a touchdown and 100 yards".
///
/// Zero counts are dropped unless `include_zeros` is set. Pure function;
/// identical inputs always yield identical text.
pub fn stat_summary(stats: &[(i64, &str)], include_zeros: bool) -> String {
    let parts: Vec<String> = stats
        .iter()
        .filter_map(|&(count, noun)| match count {
            0 if !include_zeros => None,
            1 => Some(format!("a {noun}")),
            n => Some(format!("{n} {noun}s")),
        })
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        n => format!("{} and {}", parts[..n - 1].join(", "), parts[n - 1]),
    }
}
