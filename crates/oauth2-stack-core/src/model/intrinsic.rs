//! CloudFormation values that may only be known once the stack is deployed.
//!
//! An [`Intrinsic`] is either a literal string or one of the intrinsic
//! functions the provisioning engine resolves (`Ref`, `Fn::GetAtt`,
//! `Fn::Join`). It serializes to the template JSON form and can be rendered
//! as a short preview for humans.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::LogicalId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intrinsic {
    /// Plain string known at synthesis time.
    Literal(String),
    /// `{"Ref": "<id>"}`
    Ref(LogicalId),
    /// `{"Fn::GetAtt": ["<id>", "<attribute>"]}`
    GetAtt {
        resource: LogicalId,
        attribute: String,
    },
    /// `{"Fn::Join": ["<delimiter>", [parts...]]}`
    Join {
        delimiter: String,
        parts: Vec<Intrinsic>,
    },
}

impl Intrinsic {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn get_att(resource: &LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            resource: resource.clone(),
            attribute: attribute.into(),
        }
    }

    /// Concatenation without a delimiter.
    pub fn concat(parts: Vec<Intrinsic>) -> Self {
        Self::Join {
            delimiter: String::new(),
            parts,
        }
    }

    /// The literal string, if this value needs no deploy-time resolution.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Logical ids this value depends on, in order of appearance.
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            Self::Literal(_) => Vec::new(),
            Self::Ref(id) => vec![id],
            Self::GetAtt { resource, .. } => vec![resource],
            Self::Join { parts, .. } => parts.iter().flat_map(Intrinsic::references).collect(),
        }
    }

    /// Human readable rendering; unresolved parts appear in angle brackets.
    pub fn preview(&self) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Ref(id) => format!("<{id}>"),
            Self::GetAtt {
                resource,
                attribute,
            } => format!("<{resource}.{attribute}>"),
            Self::Join { delimiter, parts } => parts
                .iter()
                .map(Intrinsic::preview)
                .collect::<Vec<_>>()
                .join(delimiter),
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

impl From<&str> for Intrinsic {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for Intrinsic {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// `[delimiter, [parts...]]` payload of `Fn::Join`.
struct JoinArgs<'a> {
    delimiter: &'a str,
    parts: &'a [Intrinsic],
}

impl Serialize for JoinArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.delimiter)?;
        seq.serialize_element(self.parts)?;
        seq.end()
    }
}

impl Serialize for Intrinsic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => serializer.serialize_str(value),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Self::GetAtt {
                resource,
                attribute,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[resource.as_str(), attribute.as_str()])?;
                map.end()
            }
            Self::Join { delimiter, parts } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "Fn::Join",
                    &JoinArgs {
                        delimiter,
                        parts,
                    },
                )?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(name: &'static str) -> LogicalId {
        LogicalId::from_static(name)
    }

    #[test]
    fn test_serializes_intrinsics() {
        assert_eq!(
            serde_json::to_value(Intrinsic::Ref(id("CognitoUserPool"))).unwrap(),
            json!({ "Ref": "CognitoUserPool" })
        );
        assert_eq!(
            serde_json::to_value(Intrinsic::get_att(&id("Client"), "ClientSecret")).unwrap(),
            json!({ "Fn::GetAtt": ["Client", "ClientSecret"] })
        );

        let joined = Intrinsic::concat(vec![
            Intrinsic::Ref(id("CognitoResourceServer")),
            Intrinsic::literal("/user.read"),
        ]);
        assert_eq!(
            serde_json::to_value(&joined).unwrap(),
            json!({ "Fn::Join": ["", [{ "Ref": "CognitoResourceServer" }, "/user.read"]] })
        );
    }

    #[test]
    fn test_preview_and_references() {
        let joined = Intrinsic::concat(vec![
            Intrinsic::Ref(id("CognitoResourceServer")),
            Intrinsic::literal("/user.write"),
        ]);
        assert_eq!(joined.preview(), "<CognitoResourceServer>/user.write");
        assert_eq!(joined.references(), vec![&id("CognitoResourceServer")]);
        assert_eq!(joined.as_literal(), None);
        assert_eq!(Intrinsic::from("client_credentials").as_literal(), Some("client_credentials"));
    }
}
