//! Composition of scripts that are already rendered text.

/// Join scripts one per line, dropping blank ones, with a single trailing newline.
pub fn sequence<I, S>(scripts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = non_blank(scripts).join("\n");
    out.push('\n');
    out
}

/// Join scripts with `&&`, dropping blank ones.
pub fn chain<I, S>(scripts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    non_blank(scripts).join(" && ")
}

/// Announce `message`, run the chained commands, and exit 1 with a report on
/// stderr if any of them fails.
pub fn checked<I, S>(message: &str, scripts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cmds = chain(scripts);
    if cmds.trim().is_empty() {
        return String::new();
    }
    format!(
        "echo \"{msg}...\"\n{{ {cmds}; }} || {{ echo \"{msg}\" failed; exit 1; }} >&2\necho \"...done\"\n",
        msg = message,
        cmds = cmds
    )
}

fn non_blank<I, S>(scripts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    scripts
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
