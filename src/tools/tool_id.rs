//! Stable identifiers of interactive tools.
//!
//! Codes and names are part of saved settings and scripts. Once shipped they
//! never change; a new tool gets a new code at the end.

/// Declares a `#[repr(u16)]` identifier enum with explicit codes and stable
/// names. Parsing and serde go through the given lookup table so that every
/// textual surface resolves names the same way.
macro_rules! stable_id_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal, $lut:path) {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every identifier, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Declared names, the source of the lookup table.
            pub(crate) const NAMES: &'static [(&'static str, $name)] =
                &[ $( ($text, $name::$variant), )+ ];

            pub fn code(self) -> u16 {
                self as u16
            }

            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::utils::lut::UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $lut().lookup(s).ok_or_else(|| $crate::utils::lut::UnknownName {
                    kind: $kind,
                    name: s.to_string(),
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                name.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use stable_id_enum;

stable_id_enum! {
    /// Identifies one kind of interactive editing operation.
    pub enum ToolId ("tool", crate::tools::catalog::tool_lut) {
        Delete = 1 => "DELETE",
        Move = 2 => "MOVE",
        DrawPoint2d = 3 => "DRAW_POINT_2D",
        DrawLine2d = 4 => "DRAW_LINE_2D",
        DrawCircle2d = 5 => "DRAW_CIRCLE_2D",
        DrawRectangle = 6 => "DRAW_RECTANGLE",
        DrawWorkplane = 7 => "DRAW_WORKPLANE",
        ConstrainCoincident = 8 => "CONSTRAIN_COINCIDENT",
        ConstrainHorizontal = 9 => "CONSTRAIN_HORIZONTAL",
        ConstrainVertical = 10 => "CONSTRAIN_VERTICAL",
        ConstrainDistance = 11 => "CONSTRAIN_DISTANCE",
        EnterDatum = 12 => "ENTER_DATUM",
        ToggleConstruction = 13 => "TOGGLE_CONSTRUCTION",
        SetConstruction = 14 => "SET_CONSTRUCTION",
        UnsetConstruction = 15 => "UNSET_CONSTRUCTION",
        SetWorkplane = 16 => "SET_WORKPLANE",
        UnsetWorkplane = 17 => "UNSET_WORKPLANE",
        Extrude = 18 => "EXTRUDE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shipped codes. Changing one breaks saved settings and scripts.
    #[test]
    fn test_codes_are_pinned() {
        let pinned = [
            (ToolId::Delete, 1),
            (ToolId::Move, 2),
            (ToolId::DrawLine2d, 4),
            (ToolId::ConstrainDistance, 11),
            (ToolId::EnterDatum, 12),
            (ToolId::UnsetWorkplane, 17),
            (ToolId::Extrude, 18),
        ];
        for (id, code) in pinned {
            assert_eq!(id.code(), code, "{id}");
            assert_eq!(ToolId::from_code(code), Some(id));
        }
        assert_eq!(ToolId::from_code(0), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("DRAW_LINE_2D".parse::<ToolId>(), Ok(ToolId::DrawLine2d));
        assert_eq!(ToolId::Extrude.to_string(), "EXTRUDE");
        let err = "draw_line_2d".parse::<ToolId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown tool name \"draw_line_2d\"");
    }

    #[test]
    fn test_serialized_by_name() {
        let json = serde_json::to_string(&ToolId::ConstrainHorizontal).unwrap();
        assert_eq!(json, "\"CONSTRAIN_HORIZONTAL\"");
        let back: ToolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ToolId::ConstrainHorizontal);
        assert!(serde_json::from_str::<ToolId>("\"NOPE\"").is_err());
    }
}
