//! Splitting of recorded .msg schemas into per-type sections.
//!
//! A ROS 2 recorder stores the top-level definition first, followed by the
//! definitions of every referenced type, each introduced by a `====`
//! separator line and a `MSG: <package>/<Type>` header:
//!
//! ```text
//! std_msgs/Header header
//! geometry_msgs/Point position
//! ================================================================================
//! MSG: std_msgs/Header
//! builtin_interfaces/Time stamp
//! string frame_id
//! ================================================================================
//! MSG: geometry_msgs/Point
//! float64 x
//! float64 y
//! float64 z
//! ```

use msgseries_ros2_common::Ros2Error;

/// One type definition extracted from a schema blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSection {
    /// `package/Type` from the `MSG:` header, or the schema name for the
    /// leading section.
    pub type_name: String,
    pub body: String,
}

/// Split `schema_text` into the main section (named `schema_name`) followed
/// by its dependency sections.
pub fn split_sections(schema_name: &str, schema_text: &str) -> Result<Vec<MsgSection>, Ros2Error> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in schema_text.lines() {
        if is_separator_line(line) {
            blocks.push(Vec::new());
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    let mut sections = Vec::with_capacity(blocks.len());
    let mut blocks = blocks.into_iter();
    if let Some(main) = blocks.next() {
        sections.push(MsgSection {
            type_name: schema_name.to_string(),
            body: main.join("\n"),
        });
    }
    for block in blocks.filter(|b| b.iter().any(|l| !l.trim().is_empty())) {
        sections.push(parse_dependency(&block)?);
    }
    Ok(sections)
}

fn parse_dependency(lines: &[&str]) -> Result<MsgSection, Ros2Error> {
    let mut it = lines.iter().skip_while(|l| l.trim().is_empty());
    let header = it
        .next()
        .map(|l| l.trim())
        .ok_or_else(|| Ros2Error("empty msg section".to_string()))?;
    let type_name = header
        .strip_prefix("MSG:")
        .ok_or_else(|| Ros2Error(format!("missing `MSG:` header: {header}")))?
        .trim();
    if type_name.is_empty() {
        return Err("empty type name in `MSG:` header".into());
    }
    Ok(MsgSection {
        type_name: type_name.to_string(),
        body: it.copied().collect::<Vec<_>>().join("\n"),
    })
}

fn is_separator_line(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && t.chars().all(|c| c == '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_section_keeps_schema_name() {
        let sections = split_sections("std_msgs/msg/Float64", "float64 data\n").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].type_name, "std_msgs/msg/Float64");
        assert_eq!(sections[0].body, "float64 data");
    }

    #[test]
    fn dependency_sections_are_named_by_header() {
        let text = "geometry_msgs/Point p\n\
                    ================================================================================\n\
                    MSG: geometry_msgs/Point\n\
                    float64 x\n";
        let sections = split_sections("ex/msg/A", text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].type_name, "geometry_msgs/Point");
        assert_eq!(sections[1].body, "float64 x");
    }

    #[test]
    fn missing_header_is_an_error() {
        let text = "int32 a\n====\nfloat64 x\n";
        let err = split_sections("ex/msg/A", text).unwrap_err();
        assert!(err.to_string().contains("MSG:"));
    }
}
