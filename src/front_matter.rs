use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub header: Mapping,
    pub body: String,
}

/// Splits `---` delimited YAML front matter from the body.
///
/// Files without a leading delimiter have an empty header and are all body.
pub fn parse(contents: &str) -> anyhow::Result<ParsedEntry> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

    let mut lines = contents.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(ParsedEntry {
            header: Mapping::new(),
            body: String::new(),
        });
    };
    if first.trim_end() != "---" {
        return Ok(ParsedEntry {
            header: Mapping::new(),
            body: contents.to_owned(),
        });
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        yaml.push_str(line);
    }
    if !closed {
        anyhow::bail!("front matter is not closed with '---'");
    }

    let body: String = lines.collect();
    let header = parse_header(&yaml)?;
    Ok(ParsedEntry { header, body })
}

/// Parses a YAML document that must be a mapping (or empty).
pub fn parse_header(yaml: &str) -> anyhow::Result<Mapping> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|err| anyhow::anyhow!("deserialize front matter: {err}"))?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => anyhow::bail!("front matter must be a mapping, found {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
