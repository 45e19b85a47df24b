use minijinja::Environment;
use minijinja::UndefinedBehavior;
use minijinja::syntax::SyntaxConfig;

use crate::GroupStackError;
use crate::GroupStackResult;
use crate::config::Params;
use crate::scanner::TextSegment;

/// Separator placed between the rendered segments of one file.
pub const SEGMENT_SEPARATOR: &str = "\n";

const TEMPLATE_NAME: &str = "__segment__";

/// Render a single text segment against its own parameters.
pub fn render_segment(segment: &TextSegment) -> GroupStackResult<String> {
	let bytes = std::fs::read(&segment.source)
		.map_err(|e| GroupStackError::file_operation("read", &segment.source, &e))?;
	let content = String::from_utf8(bytes).map_err(|_| {
		GroupStackError::SourceNotUtf8 {
			path: segment.source.display().to_string(),
		}
	})?;

	render_template(&content, &segment.params).map_err(|reason| {
		GroupStackError::TemplateRender {
			path: segment.source.display().to_string(),
			reason,
		}
	})
}

/// Render every segment and join the results in order.
pub fn render_segments(segments: &[TextSegment]) -> GroupStackResult<String> {
	let rendered = segments
		.iter()
		.map(render_segment)
		.collect::<GroupStackResult<Vec<_>>>()?;

	Ok(rendered.join(SEGMENT_SEPARATOR))
}

/// Interpolate `params` into `content`.
///
/// Expressions use `<%= name %>`, statements `<% ... %>` and comments
/// `<%# ... %>`. Referencing a parameter that does not exist is an error.
/// Content without any `<%` marker is returned unchanged.
pub fn render_template(content: &str, params: &Params) -> Result<String, String> {
	if !has_template_syntax(content) {
		return Ok(content.to_string());
	}

	let mut env = Environment::new();
	env.set_syntax(template_syntax()?);
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(UndefinedBehavior::Strict);
	env.add_template(TEMPLATE_NAME, content)
		.map_err(|e| e.to_string())?;

	let template = env.get_template(TEMPLATE_NAME).map_err(|e| e.to_string())?;
	template
		.render(minijinja::Value::from_serialize(params))
		.map_err(|e| e.to_string())
}

fn template_syntax() -> Result<SyntaxConfig, String> {
	SyntaxConfig::builder()
		.block_delimiters("<%", "%>")
		.variable_delimiters("<%=", "%>")
		.comment_delimiters("<%#", "%>")
		.build()
		.map_err(|e| e.to_string())
}

fn has_template_syntax(content: &str) -> bool {
	content.contains("<%")
}
