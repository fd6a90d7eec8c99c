use serde::{Deserialize, Serialize};

/// Entities farther than this (grid units) are not classified by default
pub const DEFAULT_LOOKUP_RANGE: f32 = 200.0;

/// Sound file requested when a group with `play_alert` matches
pub const ALERT_SOUND: &str = "alert.wav";

// ═══════════════════════════════════════════════════════════════════════════
// Colors
// ═══════════════════════════════════════════════════════════════════════════

/// RGBA color, serialized as `[r, g, b, a]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// A color with zero opacity is never drawn
    pub fn is_visible(&self) -> bool {
        self.alpha() > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entity Groups
// ═══════════════════════════════════════════════════════════════════════════

/// A named rule group: path templates plus how matching entities are drawn
///
/// Groups are evaluated in configured order; the first group with any
/// matching template wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityGroup {
    /// Display name, used in alert requests and logs
    pub name: String,

    /// Templates of `&`-joined regex atoms (`!` negates an atom)
    pub path_templates: Vec<String>,

    // ─── Radius ─────────────────────────────────────────────────────────────
    /// Replaces the entity's own size when > 0
    pub base_size_override: f32,

    /// Use a scale of 1 instead of the entity's scale
    pub ignore_scale: bool,

    /// Multiplier applied to the final radius
    pub custom_scale: f32,

    // ─── Display ────────────────────────────────────────────────────────────
    pub circle_color: Rgba,
    pub border_color: Rgba,
    pub border_thickness: f32,

    // ─── Alerts ─────────────────────────────────────────────────────────────
    /// Request an alert sound the first time an entity matches this group
    pub play_alert: bool,
}

impl Default for EntityGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            path_templates: Vec::new(),
            base_size_override: 0.0,
            ignore_scale: false,
            custom_scale: 1.0,
            circle_color: Rgba::new(255, 0, 0, 80),
            border_color: Rgba::new(255, 0, 0, 255),
            border_thickness: 1.0,
            play_alert: false,
        }
    }
}

impl EntityGroup {
    /// Override radius, if one is configured
    pub fn size_override(&self) -> Option<f32> {
        (self.base_size_override > 0.0).then_some(self.base_size_override)
    }

    pub fn draws_fill(&self) -> bool {
        self.circle_color.is_visible()
    }

    pub fn draws_border(&self) -> bool {
        self.border_color.is_visible() && self.border_thickness > 0.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════════

/// User-authored configuration for effect zone tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Entities at or beyond this distance from the player are skipped
    pub entity_lookup_range: f32,

    /// Keep drawing while a fullscreen panel is open
    pub ignore_fullscreen_panels: bool,

    /// Keep drawing while a large panel is open
    pub ignore_large_panels: bool,

    /// Record paths that match no group
    pub collect_unknown_effects: bool,

    /// Emit path labels and verbose logs
    pub enable_debugging: bool,

    /// Paths matching any of these are never classified
    pub blacklist_templates: Vec<String>,

    /// Unmatched paths seen so far (deduplicated, insertion order)
    pub unknown_effects: Vec<String>,

    /// Paths present when the player died (deduplicated, insertion order)
    pub lethal_effects: Vec<String>,

    /// Ordered rule groups, kept last so TOML writes them as trailing tables
    #[serde(rename = "group")]
    pub entity_groups: Vec<EntityGroup>,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            entity_lookup_range: DEFAULT_LOOKUP_RANGE,
            ignore_fullscreen_panels: false,
            ignore_large_panels: false,
            collect_unknown_effects: true,
            enable_debugging: false,
            blacklist_templates: Vec::new(),
            entity_groups: Vec::new(),
            unknown_effects: Vec::new(),
            lethal_effects: Vec::new(),
        }
    }
}

impl ZoneSettings {
    /// Every template that can claim a path: blacklist first, then groups in order
    pub fn all_templates(&self) -> impl Iterator<Item = &str> {
        self.blacklist_templates.iter().map(String::as_str).chain(
            self.entity_groups
                .iter()
                .flat_map(|g| g.path_templates.iter().map(String::as_str)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings_toml() {
        let toml = r#"
entity_lookup_range = 150.0
blacklist_templates = ["Metadata/Effects/Environment"]

[[group]]
name = "Fire"
path_templates = ["ground_fire&!small"]
custom_scale = 1.5
circle_color = [255, 80, 0, 60]
play_alert = true
"#;

        let settings: ZoneSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.entity_lookup_range, 150.0);
        assert_eq!(settings.blacklist_templates.len(), 1);
        assert_eq!(settings.entity_groups.len(), 1);

        let group = &settings.entity_groups[0];
        assert_eq!(group.name, "Fire");
        assert_eq!(group.custom_scale, 1.5);
        assert_eq!(group.circle_color.alpha(), 60);
        assert!(group.play_alert);
        // Unset fields fall back to defaults
        assert!(!group.ignore_scale);
        assert_eq!(group.border_color, Rgba::new(255, 0, 0, 255));
        assert!(settings.collect_unknown_effects);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: ZoneSettings = toml::from_str("").unwrap();
        assert_eq!(settings, ZoneSettings::default());
    }

    #[test]
    fn test_size_override_ignores_non_positive() {
        let mut group = EntityGroup::default();
        assert_eq!(group.size_override(), None);
        group.base_size_override = -3.0;
        assert_eq!(group.size_override(), None);
        group.base_size_override = 12.0;
        assert_eq!(group.size_override(), Some(12.0));
    }

    #[test]
    fn test_border_requires_alpha_and_thickness() {
        let mut group = EntityGroup::default();
        assert!(group.draws_border());
        group.border_thickness = 0.0;
        assert!(!group.draws_border());
        group.border_thickness = 2.0;
        group.border_color = Rgba::TRANSPARENT;
        assert!(!group.draws_border());
    }

    #[test]
    fn test_all_templates_order() {
        let settings = ZoneSettings {
            blacklist_templates: vec!["b".into()],
            entity_groups: vec![
                EntityGroup {
                    path_templates: vec!["g1".into(), "g2".into()],
                    ..Default::default()
                },
                EntityGroup {
                    path_templates: vec!["g3".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let all: Vec<&str> = settings.all_templates().collect();
        assert_eq!(all, vec!["b", "g1", "g2", "g3"]);
    }
}
