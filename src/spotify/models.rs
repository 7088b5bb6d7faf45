// Spotify Web API 数据结构
// 未建模的字段通过 `extra` 原样保留，返回给前端的内容与接口一致

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 广告的 `currently_playing_type`
pub const AD_PLAYING_TYPE: &str = "ad";

/// 一次轮询的播放状态
///
/// 可空字段使用 `Option<Option<T>>`：外层 `None` 表示字段缺失，`Some(None)` 表示显式的 `null`，
/// 序列化时两者都按原样写回。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_playing: bool,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub item: Option<Option<Track>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub progress_ms: Option<Option<u64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub currently_playing_type: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaybackStatus {
    /// 没有播放任何内容
    pub fn idle() -> Self {
        Self::stopped(None, None)
    }

    /// 已暂停或停止，保留最后一首曲目和进度
    pub fn stopped(item: Option<Track>, progress_ms: Option<u64>) -> Self {
        Self {
            is_playing: false,
            item: Some(item),
            progress_ms: Some(progress_ms),
            currently_playing_type: None,
            extra: Map::new(),
        }
    }

    pub fn item(&self) -> Option<&Track> {
        self.item.as_ref().and_then(Option::as_ref)
    }

    pub fn progress_ms(&self) -> Option<u64> {
        self.progress_ms.flatten()
    }

    pub fn is_ad(&self) -> bool {
        self.currently_playing_type
            .as_ref()
            .and_then(Option::as_deref)
            == Some(AD_PLAYING_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<Option<u64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub album: Option<Option<Album>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub artists: Option<Option<Vec<Artist>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub external_urls: Option<Option<ExternalUrls>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    /// 本地文件没有 Spotify ID
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Option::as_deref)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub images: Option<Option<Vec<Image>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub external_urls: Option<Option<ExternalUrls>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub width: Option<Option<u32>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub external_urls: Option<Option<ExternalUrls>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub spotify: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/me` 接口返回的用户资料，只关心邮箱
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// 字段存在时才会调用，`null` 变成 `Some(None)`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
