/// Build the portfolio-copy prompt for one project.
///
/// The backend is instructed to answer with a bare JSON object carrying the
/// four fields the edit form needs; extraction still tolerates prose or
/// fences around it (see `extract_json_object`).
pub fn build_prompt(title: &str, kind: &str, tools: &[String]) -> String {
    let tools_list = if tools.is_empty() {
        "various design tools".to_string()
    } else {
        tools.join(", ")
    };

    format!(
        r#"Create a professional project description for a design portfolio.

Project Details:
- Title: {title}
- Type: {kind}
- Tools Used: {tools_list}

Generate JSON with the following structure (respond ONLY with valid JSON, no markdown):
{{
  "description": "A 1-2 sentence brief description of the project",
  "problem": "The client's challenge or need (2-3 sentences)",
  "approach": "Your design approach and methodology (2-3 sentences)",
  "outcome": "The result and impact of your work (2-3 sentences)"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_project_metadata() {
        let prompt = build_prompt(
            "EcoBrand Identity",
            "Brand Identity",
            &["Figma".to_string(), "Illustrator".to_string()],
        );
        assert!(prompt.contains("Title: EcoBrand Identity"));
        assert!(prompt.contains("Type: Brand Identity"));
        assert!(prompt.contains("Tools Used: Figma, Illustrator"));
        assert!(prompt.contains("respond ONLY with valid JSON"));
    }

    #[test]
    fn test_empty_tools_get_a_generic_placeholder() {
        let prompt = build_prompt("Poster", "Print", &[]);
        assert!(prompt.contains("Tools Used: various design tools"));
    }
}
