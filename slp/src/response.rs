//! The normalized status response.
//! [Server List Ping](https://minecraft.wiki/w/Java_Edition_protocol/Server_List_Ping#Status_Response)

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::Description;

const PNG_DATA_URI: &str = "data:image/png;base64,";

/// A server's status as returned by a single strategy, before the address it
/// was fetched from is attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerStatus {
    /// The version of the server. Simple legacy responses do not carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// Information about online players
    pub players: Players,
    /// The description of the server (MOTD).
    pub description: Description,
    /// The server icon (a Base64-encoded PNG image data URI)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Mod information sent by Forge servers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modinfo: Option<ModInfo>,
    /// Does this server enforce server signing?
    #[serde(rename = "enforcesSecureChat", skip_serializing_if = "Option::is_none")]
    pub enforces_secure_chat: Option<bool>,
    /// Does this server have chat previews?
    #[serde(rename = "previewsChat", skip_serializing_if = "Option::is_none")]
    pub previews_chat: Option<bool>,
}

impl ServerStatus {
    /// A status carrying only the fields every protocol provides.
    #[must_use]
    pub const fn new(version: Option<Version>, players: Players, description: Description) -> Self {
        Self {
            version,
            players,
            description,
            favicon: None,
            modinfo: None,
            enforces_secure_chat: None,
            previews_chat: None,
        }
    }

    /// Decodes the favicon into PNG bytes.
    ///
    /// Returns `None` if there is no favicon, or it is not a base64 PNG data URI.
    #[must_use]
    pub fn favicon_png(&self) -> Option<Vec<u8>> {
        let data = self.favicon.as_deref()?.strip_prefix(PNG_DATA_URI)?;
        // some servers wrap the base64 body like a MIME message
        let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD.decode(data).ok()
    }
}

/// Information about the server's version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Version {
    /// The name of the version the server is running
    ///
    /// In practice this comes in a large variety of different formats.
    pub name: String,
    /// See [Protocol Version Numbers](https://minecraft.wiki/w/Protocol_version_numbers)
    pub protocol: i32,
}

/// The stats for players on the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Players {
    /// The amount of players online.
    pub online: u32,
    /// The max amount of players.
    pub max: u32,
    /// A preview of which players are online
    ///
    /// In practice servers often don't send this or use it for more advertising
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<Player>>,
}

/// An online player of the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Player {
    /// The player's UUID
    pub id: String,
    /// The name of the player.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ForgeModMetadata {
    pub modid: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ForgeModInfoList {
    #[serde(rename = "modList")]
    pub mod_list: Vec<ForgeModMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ModInfo {
    #[serde(rename = "FML")]
    Fml(ForgeModInfoList),
}

/// The response to a successful ping: the server's status plus where it was
/// actually fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingResponse {
    /// The host that was connected to, after SRV resolution.
    pub host: String,
    pub port: u16,
    /// The numeric address of the peer, if the socket reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub status: ServerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = r#"{
        "version": {"name": "1.21", "protocol": 767},
        "players": {
            "max": 100,
            "online": 5,
            "sample": [{"name": "thinkofdeath", "id": "4566e69f-c907-48ee-8d71-d7ba5aa00d20"}]
        },
        "description": {"text": "Hello world"},
        "favicon": "data:image/png;base64,iVBORw0KGgo=",
        "enforcesSecureChat": true
    }"#;

    #[test]
    fn deserialize_full_status() {
        let status: ServerStatus = serde_json::from_str(STATUS).unwrap();
        assert_eq!(
            status.version,
            Some(Version {
                name: "1.21".to_string(),
                protocol: 767
            })
        );
        assert_eq!(status.players.online, 5);
        assert_eq!(status.players.max, 100);
        assert_eq!(status.players.sample.as_ref().unwrap()[0].name, "thinkofdeath");
        assert_eq!(status.description.plain_text(), "Hello world");
        assert_eq!(status.enforces_secure_chat, Some(true));
        assert_eq!(status.previews_chat, None);
        assert_eq!(status.modinfo, None);
    }

    #[test]
    fn forge_modinfo() {
        let status: ServerStatus = serde_json::from_str(
            r#"{"players":{"max":1,"online":0},"description":"",
                "modinfo":{"type":"FML","modList":[{"modid":"forge","version":"14.23.5.2860"}]}}"#,
        )
        .unwrap();
        let Some(ModInfo::Fml(list)) = status.modinfo else {
            panic!("expected forge mod info");
        };
        assert_eq!(list.mod_list[0].modid, "forge");
    }

    #[test]
    fn players_are_required() {
        assert!(serde_json::from_str::<ServerStatus>(r#"{"description":"hi"}"#).is_err());
        assert!(
            serde_json::from_str::<ServerStatus>(r#"{"players":{"max":1,"online":-1},"description":"hi"}"#)
                .is_err()
        );
    }

    #[test]
    fn favicon_decodes_png() {
        let status: ServerStatus = serde_json::from_str(STATUS).unwrap();
        let png = status.favicon_png().unwrap();
        assert_eq!(&png[..4], b"\x89PNG");

        let mut status = status;
        status.favicon = Some("not a data uri".to_string());
        assert_eq!(status.favicon_png(), None);
    }

    #[test]
    fn ping_response_flattens_status() {
        let response = PingResponse {
            host: "mc.example.com".to_string(),
            port: 25565,
            ip: Some("192.0.2.1".to_string()),
            status: ServerStatus::new(
                None,
                Players {
                    online: 3,
                    max: 20,
                    sample: None,
                },
                "A MOTD".into(),
            ),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "host": "mc.example.com",
                "port": 25565,
                "ip": "192.0.2.1",
                "players": {"online": 3, "max": 20},
                "description": "A MOTD"
            })
        );
    }
}
