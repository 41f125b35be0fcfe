//! Schema/message encoding identifiers from the mcap registry
//! (<https://mcap.dev/spec/registry>) used to pick a [`SchemaProvider`].
//!
//! [`SchemaProvider`]: crate::SchemaProvider

use std::fmt;

/// Declares an encoding enum whose known variants map one-to-one onto
/// registry identifiers. Anything else round-trips through `Unknown`.
macro_rules! registry_encoding {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $id:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)*
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $id,)*
                    Self::Unknown(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($id => Self::$variant,)*
                    other => Self::Unknown(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

registry_encoding! {
    /// Encoding of the schema text attached to a channel.
    SchemaEncoding {
        /// No schema attached.
        None => "",
        Ros1Msg => "ros1msg",
        Ros2Msg => "ros2msg",
        Ros2Idl => "ros2idl",
    }
}

registry_encoding! {
    /// Encoding of the message payload bytes.
    MessageEncoding {
        Ros1 => "ros1",
        /// OMG CDR as used by ROS 2.
        Cdr => "cdr",
    }
}

/// Provider lookup key: a (schema_encoding, message_encoding) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingKey {
    pub schema_encoding: SchemaEncoding,
    pub message_encoding: MessageEncoding,
}

impl EncodingKey {
    pub fn new(schema_encoding: SchemaEncoding, message_encoding: MessageEncoding) -> Self {
        Self {
            schema_encoding,
            message_encoding,
        }
    }
}

impl fmt::Display for EncodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.schema_encoding, self.message_encoding)
    }
}
