//! # Host Payload Schemas
//!
//! Typed shapes for the payloads exchanged by the convenience calls. The bus
//! core never looks inside these; the client API converts them to and from
//! `serde_json::Value` argument lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where in the host UI the embedded content is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrameContexts {
    Settings,
    Content,
    Authentication,
    Remove,
    Task,
    SidePanel,
    Stage,
    MeetingStage,
    /// A context this library does not know about yet.
    Other(String),
}

impl FrameContexts {
    /// Wire name of the context.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Settings => "settings",
            Self::Content => "content",
            Self::Authentication => "authentication",
            Self::Remove => "remove",
            Self::Task => "task",
            Self::SidePanel => "sidePanel",
            Self::Stage => "stage",
            Self::MeetingStage => "meetingStage",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for FrameContexts {
    fn from(value: &str) -> Self {
        match value {
            "settings" => Self::Settings,
            "content" => Self::Content,
            "authentication" => Self::Authentication,
            "remove" => Self::Remove,
            "task" => Self::Task,
            "sidePanel" => Self::SidePanel,
            "stage" => Self::Stage,
            "meetingStage" => Self::MeetingStage,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FrameContexts {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FrameContexts> for String {
    fn from(value: FrameContexts) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FrameContexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of host client the content runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostClientType {
    Desktop,
    Web,
    Android,
    Ios,
    Rigel,
    SurfaceHub,
    Other(String),
}

impl From<String> for HostClientType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "desktop" => Self::Desktop,
            "web" => Self::Web,
            "android" => Self::Android,
            "ios" => Self::Ios,
            "rigel" => Self::Rigel,
            "surfaceHub" => Self::SurfaceHub,
            _ => Self::Other(value),
        }
    }
}

impl From<HostClientType> for String {
    fn from(value: HostClientType) -> Self {
        match value {
            HostClientType::Desktop => "desktop".into(),
            HostClientType::Web => "web".into(),
            HostClientType::Android => "android".into(),
            HostClientType::Ios => "ios".into(),
            HostClientType::Rigel => "rigel".into(),
            HostClientType::SurfaceHub => "surfaceHub".into(),
            HostClientType::Other(name) => name,
        }
    }
}

/// Team type, encoded as a small integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TeamType {
    Standard,
    Edu,
    Class,
    Plc,
    Staff,
    Other(u8),
}

impl From<u8> for TeamType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Standard,
            1 => Self::Edu,
            2 => Self::Class,
            3 => Self::Plc,
            4 => Self::Staff,
            other => Self::Other(other),
        }
    }
}

impl From<TeamType> for u8 {
    fn from(value: TeamType) -> Self {
        match value {
            TeamType::Standard => 0,
            TeamType::Edu => 1,
            TeamType::Class => 2,
            TeamType::Plc => 3,
            TeamType::Staff => 4,
            TeamType::Other(other) => other,
        }
    }
}

/// Role of the current user in the team, encoded as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UserTeamRole {
    Admin,
    User,
    Guest,
    Other(u8),
}

impl From<u8> for UserTeamRole {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Admin,
            1 => Self::User,
            2 => Self::Guest,
            other => Self::Other(other),
        }
    }
}

impl From<UserTeamRole> for u8 {
    fn from(value: UserTeamRole) -> Self {
        match value {
            UserTeamRole::Admin => 0,
            UserTeamRole::User => 1,
            UserTeamRole::Guest => 2,
            UserTeamRole::Other(other) => other,
        }
    }
}

/// Contextual metadata returned by `getContext`.
///
/// Every field is optional on the wire. Fields this library does not model
/// are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_full_screen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_type: Option<TeamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_site_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_site_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_relative_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_team_role: Option<UserTeamRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_team_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_client_type: Option<HostClientType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_context: Option<FrameContexts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharepoint: Option<Value>,
    #[serde(rename = "tenantSKU", skip_serializing_if = "Option::is_none")]
    pub tenant_sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_license_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_launch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,
    /// Fields not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// URLs describing the current frame, sent with `setFrameContext`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    /// URL of the content rendered in the frame.
    pub content_url: String,
    /// URL opened when the user navigates to the website.
    pub website_url: String,
}

/// Sub-entity to share as a deep link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepLinkParameters {
    pub sub_entity_id: String,
    pub sub_entity_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_entity_web_url: Option<String>,
}

/// Filters for tab instance queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabInstanceParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_channels_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_teams_only: Option<bool>,
}

/// A single tab instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabInstance {
    pub tab_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_tab_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_view_unix_epoch_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// Result of a tab instance query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabInformation {
    pub team_tabs: Vec<TabInstance>,
}

/// Payload of the host `load` notification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadContext {
    pub entity_id: String,
    pub content_url: String,
}
