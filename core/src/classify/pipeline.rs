//! Per-tick classification of effect entities
//!
//! For each entity, in order, stopping at the first branch that applies:
//!
//! 1. recently rejected -> skip
//! 2. no usable path -> reject
//! 3. beyond lookup range -> skip (not rejected, distance can shrink)
//! 4. blacklisted -> reject
//! 5. first matching group -> draw, or reject if radius/scale is unknown;
//!    no group -> collect as unknown and reject
//!
//! Entities that reach step 5 feed the lethal zone tracker whatever the
//! group outcome was.

use std::sync::Arc;
use std::time::Instant;

use zonewatch_types::{ALERT_SOUND, EntityGroup, ZoneSettings};

use crate::cache::RejectionCache;
use crate::catalog::PathCatalog;
use crate::clock::Clock;
use crate::entity::{EntitySnapshot, Frame, PanelState};
use crate::lethal::LethalZoneTracker;
use crate::matcher::MatcherCache;

use super::alert::AlertGate;
use super::output::{AlertRequest, DebugText, DrawCommand, TickOutput};

/// Rejection records are pruned once a tick when the map grows past this
const REJECTION_PRUNE_THRESHOLD: usize = 1024;

/// What happened to one entity this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    RecentlyRejected,
    NoPath,
    OutOfRange,
    Blacklisted,
    /// Matched a group but neither override nor entity size was available
    NoRadius,
    /// Matched a group that uses entity scale, but the entity has none
    NoScale,
    /// Matched no group
    Unknown,
    /// Matched the group at this index and was drawn
    Classified(usize),
}

impl Verdict {
    /// Branches that put the entity in the rejection cache
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NoPath | Self::Blacklisted | Self::NoRadius | Self::NoScale | Self::Unknown
        )
    }

    /// Branches that got as far as group lookup
    pub fn reached_groups(&self) -> bool {
        matches!(
            self,
            Self::NoRadius | Self::NoScale | Self::Unknown | Self::Classified(_)
        )
    }
}

pub struct ZoneClassifier {
    settings: ZoneSettings,
    matchers: MatcherCache,
    rejections: RejectionCache,
    lethal: LethalZoneTracker,
    alerts: AlertGate,
    catalog: Arc<PathCatalog>,
    clock: Arc<dyn Clock>,
}

impl ZoneClassifier {
    /// Build a classifier with a default (2s window) lethal tracker
    ///
    /// Fails only if the cache sweeper thread cannot be started.
    pub fn new(
        settings: ZoneSettings,
        catalog: Arc<PathCatalog>,
        clock: Arc<dyn Clock>,
    ) -> std::io::Result<Self> {
        let lethal = LethalZoneTracker::new(Arc::clone(&clock))?;
        Ok(Self::with_lethal_tracker(settings, catalog, clock, lethal))
    }

    pub fn with_lethal_tracker(
        settings: ZoneSettings,
        catalog: Arc<PathCatalog>,
        clock: Arc<dyn Clock>,
        lethal: LethalZoneTracker,
    ) -> Self {
        Self {
            settings,
            matchers: MatcherCache::new(),
            rejections: RejectionCache::new(Arc::clone(&clock)),
            lethal,
            alerts: AlertGate::default(),
            catalog,
            clock,
        }
    }

    pub fn settings(&self) -> &ZoneSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<PathCatalog> {
        &self.catalog
    }

    pub fn rejections(&self) -> &RejectionCache {
        &self.rejections
    }

    pub fn lethal_tracker(&self) -> &LethalZoneTracker {
        &self.lethal
    }

    /// Swap in a new rule set; compiled templates are dropped with the old one
    pub fn update_settings(&mut self, settings: ZoneSettings) {
        self.settings = settings;
        self.matchers.clear();
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    pub fn tick(&mut self, frame: &Frame) -> TickOutput {
        if self.world_hidden(&frame.panels) {
            return TickOutput::skipped();
        }

        let mut out = TickOutput {
            new_lethal: self.lethal.observe_reference(&frame.reference, &self.catalog),
            ..Default::default()
        };

        let now = self.clock.now();
        for entity in frame.entities.iter().flatten() {
            self.process_entity(entity, now, &mut out);
        }

        if self.rejections.len() > REJECTION_PRUNE_THRESHOLD {
            let pruned = self.rejections.prune();
            tracing::trace!(pruned, "Pruned stale rejections");
        }

        out
    }

    /// Classify one entity, recording rejection and lethal tracking as needed
    pub fn process_entity(
        &mut self,
        entity: &EntitySnapshot,
        now: Instant,
        out: &mut TickOutput,
    ) -> Verdict {
        let verdict = self.classify(entity, now, out);
        if verdict.is_rejection() {
            self.rejections.mark_rejected(entity.id);
        }
        if verdict.reached_groups() {
            self.lethal.record(entity);
        }
        verdict
    }

    fn world_hidden(&self, panels: &PanelState) -> bool {
        (panels.fullscreen_open && !self.settings.ignore_fullscreen_panels)
            || (panels.large_open && !self.settings.ignore_large_panels)
    }

    fn classify(&mut self, entity: &EntitySnapshot, now: Instant, out: &mut TickOutput) -> Verdict {
        if self.rejections.is_rejected_recently(entity.id) {
            return Verdict::RecentlyRejected;
        }

        let Some(path) = entity.path() else {
            return Verdict::NoPath;
        };

        if entity.distance >= self.settings.entity_lookup_range {
            return Verdict::OutOfRange;
        }

        if self
            .matchers
            .any_match(&self.settings.blacklist_templates, path)
        {
            return Verdict::Blacklisted;
        }

        let Some(group_idx) = self.find_group(path) else {
            if self.settings.enable_debugging {
                tracing::info!(path, "No group for effect path");
            }
            if self.settings.collect_unknown_effects && self.catalog.offer_unknown(path) {
                tracing::debug!(path, "Collected unknown effect");
            }
            return Verdict::Unknown;
        };
        let group = &self.settings.entity_groups[group_idx];

        let Some(base_radius) = group.size_override().or_else(|| entity.native_size()) else {
            return Verdict::NoRadius;
        };

        let scale = if group.ignore_scale {
            Some(1.0)
        } else {
            entity.scale
        };
        let Some(scale) = scale else {
            tracing::error!(entity_id = entity.id, path, "Unable to read scale for entity");
            return Verdict::NoScale;
        };

        if group.play_alert && self.alerts.try_fire(entity.id, now) {
            out.alerts.push(AlertRequest {
                entity_id: entity.id,
                group: group.name.clone(),
                sound: ALERT_SOUND.to_string(),
            });
        }

        let radius = base_radius * scale * group.custom_scale;
        emit_draws(group, entity, radius, self.settings.enable_debugging, out);

        Verdict::Classified(group_idx)
    }

    /// Index of the first group with any template matching `path`
    fn find_group(&mut self, path: &str) -> Option<usize> {
        let matchers = &mut self.matchers;
        self.settings
            .entity_groups
            .iter()
            .position(|g| matchers.any_match(&g.path_templates, path))
    }

    // ─── Commands ───────────────────────────────────────────────────────────

    /// Drop unknown paths that the current rules now match
    pub fn remove_matched_unknown(&mut self) -> usize {
        self.catalog.remove_matched(&self.settings, &mut self.matchers)
    }

    /// Empty the unknown and lethal collections
    pub fn clear_unknown(&self) {
        self.catalog.clear_all();
        tracing::info!("Cleared unknown and lethal effects");
    }

    /// Stop the lethal tracker's background sweeper
    pub fn shutdown(&mut self) {
        self.lethal.shutdown();
    }
}

fn emit_draws(
    group: &EntityGroup,
    entity: &EntitySnapshot,
    radius: f32,
    debug: bool,
    out: &mut TickOutput,
) {
    if group.draws_fill() {
        if debug && let Some(name) = entity.short_name() {
            out.debug_texts.push(DebugText {
                text: name.to_string(),
                position: entity.world_pos,
            });
        }
        out.draws.push(DrawCommand::FilledCircle {
            center: entity.world_pos,
            radius,
            color: group.circle_color,
        });
    }

    if group.draws_border() {
        out.draws.push(DrawCommand::Circle {
            center: entity.world_pos,
            radius,
            color: group.border_color,
            thickness: group.border_thickness,
        });
    }
}

impl std::fmt::Debug for ZoneClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneClassifier")
            .field("groups", &self.settings.entity_groups.len())
            .field("compiled_templates", &self.matchers.len())
            .field("rejections", &self.rejections)
            .field("lethal", &self.lethal)
            .finish()
    }
}
