//! Minecraft [text components](https://minecraft.wiki/w/Text_component_format)
//! as used by the server description (MOTD).

use serde::{Deserialize, Deserializer, Serialize};

const SECTION: char = '§';

/// The server description. Older servers and all legacy responses send a
/// plain string, newer ones send a text component. A top-level array is read
/// as a component with an empty text and the elements as `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Component(ChatComponent),
}

impl Description {
    /// The description with all formatting dropped. Legacy `§` codes inside
    /// plain strings are kept as-is.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Component(component) => component.plain_text(),
        }
    }

    /// The description as a component, converting `§` codes in plain strings.
    #[must_use]
    pub fn to_component(&self) -> ChatComponent {
        match self {
            Self::Text(text) => ChatComponent::from_legacy(text),
            Self::Component(component) => component.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for Description {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Node::deserialize(deserializer)? {
            Node::Text(text) => Self::Text(text),
            node => Self::Component(node.into()),
        })
    }
}

impl From<String> for Description {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A rich text node. Children in `extra` inherit nothing at this level; the
/// tree is kept exactly as the server sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatComponent {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(
        default,
        deserialize_with = "deserialize_extra",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra: Option<Vec<ChatComponent>>,
}

/// Anything a server may send where a component is expected. Since 1.20.3
/// unstyled children are sent as bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Node {
    Text(String),
    List(Vec<Node>),
    Component(ChatComponent),
}

impl From<Node> for ChatComponent {
    fn from(node: Node) -> Self {
        match node {
            Node::Text(text) => Self::text(text),
            Node::List(nodes) => Self {
                extra: Some(nodes.into_iter().map(Self::from).collect()),
                ..Self::default()
            },
            Node::Component(component) => component,
        }
    }
}

fn deserialize_extra<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<ChatComponent>>, D::Error> {
    let nodes = Option::<Vec<Node>>::deserialize(deserializer)?;
    Ok(nodes.map(|nodes| nodes.into_iter().map(ChatComponent::from).collect()))
}

impl ChatComponent {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Concatenates the text of this node and all of its descendants.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in self.extra.iter().flatten() {
            child.push_text(out);
        }
    }

    /// Converts text formatted with `§` codes into a component with one child
    /// per styled run.
    ///
    /// Colors `0-9a-f` replace the color and clear the styles, `k-o` add a
    /// style, `r` resets both. Unknown codes are dropped.
    ///
    /// ```
    /// use slp::{ChatColor, ChatComponent, Color};
    ///
    /// let motd = ChatComponent::from_legacy("§aA §lMinecraft§r Server");
    /// let runs = motd.extra.unwrap();
    /// assert_eq!(runs[0].text, "A ");
    /// assert_eq!(runs[0].color, Some(Color::Named(ChatColor::Green)));
    /// assert_eq!(runs[1].bold, Some(true));
    /// assert_eq!(runs[2].color, None);
    /// ```
    #[must_use]
    pub fn from_legacy(s: &str) -> Self {
        if !s.contains(SECTION) {
            return Self::text(s);
        }

        let mut runs = Vec::new();
        let mut style = Self::default();
        let mut start = 0;
        let mut last_was_section = false;

        for (idx, char) in s.char_indices() {
            if last_was_section {
                last_was_section = false;
                start = idx + char.len_utf8();
                let char = char.to_ascii_lowercase();
                if let Some(color) = ChatColor::from_code(char) {
                    style = Self {
                        color: Some(Color::Named(color)),
                        ..Self::default()
                    };
                    continue;
                }
                match char {
                    'k' => style.obfuscated = Some(true),
                    'l' => style.bold = Some(true),
                    'm' => style.strikethrough = Some(true),
                    'n' => style.underlined = Some(true),
                    'o' => style.italic = Some(true),
                    'r' => style = Self::default(),
                    _ => {}
                }
            } else if char == SECTION {
                push_run(&mut runs, &style, &s[start..idx]);
                last_was_section = true;
            }
        }
        if !last_was_section {
            push_run(&mut runs, &style, &s[start..]);
        }

        Self {
            extra: Some(runs),
            ..Self::default()
        }
    }
}

fn push_run(runs: &mut Vec<ChatComponent>, style: &ChatComponent, text: &str) {
    if text.is_empty() {
        return;
    }
    runs.push(ChatComponent {
        text: text.to_string(),
        ..style.clone()
    });
}

/// A component color: one of the sixteen named colors, or anything else the
/// server sent (newer servers use `#rrggbb`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Color {
    Named(ChatColor),
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ChatColor {
    const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// The color for a legacy `§` formatting code (`0-9`, `a-f`).
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        let index = code.to_digit(16)?;
        Self::ALL.get(index as usize).copied()
    }

    /// The legacy `§` formatting code of this color.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn code(self) -> char {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or_default();
        char::from_digit(index as u32, 16).unwrap_or('f')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(text: &str, color: Option<ChatColor>) -> ChatComponent {
        ChatComponent {
            text: text.to_string(),
            color: color.map(Color::Named),
            ..ChatComponent::default()
        }
    }

    #[test]
    fn color_codes() {
        assert_eq!(ChatColor::from_code('0'), Some(ChatColor::Black));
        assert_eq!(ChatColor::from_code('7'), Some(ChatColor::Gray));
        assert_eq!(ChatColor::from_code('8'), Some(ChatColor::DarkGray));
        assert_eq!(ChatColor::from_code('a'), Some(ChatColor::Green));
        assert_eq!(ChatColor::from_code('F'), Some(ChatColor::White));
        assert_eq!(ChatColor::from_code('g'), None);
        assert_eq!(ChatColor::from_code('l'), None);
        for color in ChatColor::ALL {
            assert_eq!(ChatColor::from_code(color.code()), Some(color));
        }
    }

    #[test]
    fn color_names() {
        assert_eq!(serde_json::to_string(&ChatColor::DarkAqua).unwrap(), "\"dark_aqua\"");
        assert_eq!(serde_json::to_string(&ChatColor::LightPurple).unwrap(), "\"light_purple\"");
        let color: Color = serde_json::from_str("\"gold\"").unwrap();
        assert_eq!(color, Color::Named(ChatColor::Gold));
        let color: Color = serde_json::from_str("\"#ff55ff\"").unwrap();
        assert_eq!(color, Color::Custom("#ff55ff".to_string()));
    }

    #[test]
    fn description_string_or_component() {
        let text: Description = serde_json::from_str("\"A Minecraft Server\"").unwrap();
        assert_eq!(text, Description::from("A Minecraft Server"));

        let component: Description = serde_json::from_str(
            r#"{"text":"Hello ","bold":true,"extra":[{"text":"world","color":"red"},{"text":"!"}]}"#,
        )
        .unwrap();
        let Description::Component(component) = &component else {
            panic!("expected a component, got {component:?}");
        };
        assert_eq!(component.bold, Some(true));
        assert_eq!(component.extra.as_ref().unwrap()[0].color, Some(Color::Named(ChatColor::Red)));
        assert_eq!(component.plain_text(), "Hello world!");
    }

    #[test]
    fn bare_string_children() {
        let description: Description =
            serde_json::from_str(r#"{"text":"","extra":["A ",{"text":"Server","bold":true}]}"#).unwrap();
        let Description::Component(component) = &description else {
            panic!("expected a component, got {description:?}");
        };
        let extra = component.extra.as_ref().unwrap();
        assert_eq!(extra[0], ChatComponent::text("A "));
        assert_eq!(extra[1].bold, Some(true));
        assert_eq!(description.plain_text(), "A Server");
    }

    #[test]
    fn array_description() {
        let description: Description =
            serde_json::from_str(r#"["A ",{"text":"Server","extra":["!"]}]"#).unwrap();
        let Description::Component(component) = &description else {
            panic!("expected a component, got {description:?}");
        };
        assert_eq!(component.text, "");
        assert_eq!(component.extra.as_ref().unwrap().len(), 2);
        assert_eq!(description.plain_text(), "A Server!");
    }

    #[test]
    fn component_without_text() {
        let description: Description =
            serde_json::from_str(r#"{"extra":[{"text":"only child"}]}"#).unwrap();
        assert_eq!(description.plain_text(), "only child");
    }

    #[test]
    fn legacy_none() {
        assert_eq!(ChatComponent::from_legacy("No color codes"), ChatComponent::text("No color codes"));
    }

    #[test]
    fn legacy_one_color() {
        let component = ChatComponent::from_legacy("§acolor a");
        assert_eq!(component.extra.unwrap(), [styled("color a", Some(ChatColor::Green))]);
    }

    #[test]
    fn legacy_color_immediate_change() {
        let component = ChatComponent::from_legacy("§a§bcolor b");
        assert_eq!(component.extra.unwrap(), [styled("color b", Some(ChatColor::Aqua))]);
    }

    #[test]
    fn legacy_color_reset() {
        let component = ChatComponent::from_legacy("§acolor a§rblank§bcolor b");
        assert_eq!(
            component.extra.unwrap(),
            [
                styled("color a", Some(ChatColor::Green)),
                styled("blank", None),
                styled("color b", Some(ChatColor::Aqua)),
            ]
        );
    }

    #[test]
    fn legacy_additive() {
        let component = ChatComponent::from_legacy("§a§nunderlined");
        let mut expected = styled("underlined", Some(ChatColor::Green));
        expected.underlined = Some(true);
        assert_eq!(component.extra.unwrap(), [expected]);
    }

    #[test]
    fn legacy_color_clears_styles() {
        let component = ChatComponent::from_legacy("§lbold§cred");
        let runs = component.extra.unwrap();
        assert_eq!(runs[0].bold, Some(true));
        assert_eq!(runs[1], styled("red", Some(ChatColor::Red)));
    }

    #[test]
    fn legacy_dangling_section() {
        let component = ChatComponent::from_legacy("text§");
        assert_eq!(component.extra.unwrap(), [styled("text", None)]);
        assert_eq!(ChatComponent::from_legacy("a§zb").plain_text(), "ab");
    }

    #[test]
    fn plain_text_of_legacy_description() {
        let description = Description::from("§6Gold §lServer");
        assert_eq!(description.to_component().plain_text(), "Gold Server");
        assert_eq!(description.plain_text(), "§6Gold §lServer");
    }
}
