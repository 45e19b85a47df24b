use similar::Algorithm;
use similar::DiffTag;
use similar::capture_diff_slices;

/// A non-blank line together with its whitespace-free comparison key.
struct SignificantLine<'a> {
	text: &'a str,
	key: String,
}

/// Describe how `rendered` differs from `current`.
///
/// Blank lines and all whitespace inside lines are ignored, so a change that
/// only re-indents or re-wraps blank lines yields `None`. Removed lines are
/// prefixed with `-` and added lines with `+`.
pub fn preview_diff(current: &str, rendered: &str) -> Option<String> {
	let old = significant_lines(current);
	let new = significant_lines(rendered);
	let old_keys: Vec<&str> = old.iter().map(|line| line.key.as_str()).collect();
	let new_keys: Vec<&str> = new.iter().map(|line| line.key.as_str()).collect();

	let mut output = String::new();
	for op in capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys) {
		let (tag, old_range, new_range) = op.as_tag_tuple();
		if matches!(tag, DiffTag::Delete | DiffTag::Replace) {
			for line in &old[old_range] {
				output.push('-');
				output.push_str(line.text);
				output.push('\n');
			}
		}
		if matches!(tag, DiffTag::Insert | DiffTag::Replace) {
			for line in &new[new_range] {
				output.push('+');
				output.push_str(line.text);
				output.push('\n');
			}
		}
	}

	if output.is_empty() {
		None
	} else {
		output.truncate(output.trim_end().len());
		Some(output)
	}
}

fn significant_lines(content: &str) -> Vec<SignificantLine<'_>> {
	content
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(|line| {
			SignificantLine {
				text: line.trim_end(),
				key: line.split_whitespace().collect(),
			}
		})
		.collect()
}
