use crate::ClientVersion;

const EXTENDED_IDS_VERSION: u32 = 960;
const FRAME_DURATIONS_VERSION: u32 = 1050;
const FRAME_GROUPS_VERSION: u32 = 1057;
const ALPHA_CHANNEL_VERSION: u32 = 1098;

/// Version dependent encoding parameters.
///
/// Resolved once when a project is opened and then passed by value into every codec and
/// compositor call. Nothing in the workspace keeps a global copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientFeatureSet {
    pub version: ClientVersion,
    pub uses_alpha_channel: bool,
    pub uses_extended_ids: bool,
    pub supports_frame_groups: bool,
    pub supports_frame_durations: bool,
}

impl ClientFeatureSet {
    /// Thresholds are cumulative, so any version in between two known ones behaves like
    /// the lower one.
    pub fn resolve(version: impl Into<ClientVersion>) -> Self {
        let version = version.into();
        let number = version.number();

        Self {
            version,
            uses_alpha_channel: number >= ALPHA_CHANNEL_VERSION,
            uses_extended_ids: number >= EXTENDED_IDS_VERSION,
            supports_frame_groups: number >= FRAME_GROUPS_VERSION,
            supports_frame_durations: number >= FRAME_DURATIONS_VERSION,
        }
    }

    pub fn with_alpha_channel(mut self, value: bool) -> Self {
        self.uses_alpha_channel = value;
        self
    }

    pub fn with_extended_ids(mut self, value: bool) -> Self {
        self.uses_extended_ids = value;
        self
    }

    pub fn with_frame_groups(mut self, value: bool) -> Self {
        self.supports_frame_groups = value;
        self
    }

    pub fn with_frame_durations(mut self, value: bool) -> Self {
        self.supports_frame_durations = value;
        self
    }

    /// Bytes per encoded pixel. Decoded pixels are always 4 bytes.
    pub fn pixel_width(&self) -> usize {
        if self.uses_alpha_channel {
            4
        } else {
            3
        }
    }

    /// Bytes per sprite id wherever ids are serialized.
    pub fn sprite_id_width(&self) -> usize {
        if self.uses_extended_ids {
            4
        } else {
            2
        }
    }

    pub fn max_sprite_id(&self) -> u32 {
        if self.uses_extended_ids {
            u32::MAX
        } else {
            u16::MAX as u32
        }
    }
}

impl Default for ClientFeatureSet {
    fn default() -> Self {
        Self::resolve(860)
    }
}
