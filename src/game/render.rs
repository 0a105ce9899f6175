use super::entity::{EntityId, EntityKind};
use super::events::{Effect, GameEvent};

/// Presentation side of the game. The session never touches it directly:
/// the host drains the event queue and hands the batch to [`present`].
pub trait Renderer {
    /// Size of the play area in CSS pixels.
    fn viewport_size(&self) -> (f64, f64);
    fn spawn_entity(&mut self, id: EntityId, kind: EntityKind, glyph: &str, x: f64, y: f64);
    fn place_entity(&mut self, id: EntityId, x: f64, y: f64);
    fn remove_entity(&mut self, id: EntityId);
    fn show_effect(&mut self, effect: &Effect, x: f64, y: f64);
    /// HUD-level events (score, streak, stats, power-ups, net, game over).
    fn display(&mut self, _event: &GameEvent) {}
}

pub fn present<R: Renderer + ?Sized>(renderer: &mut R, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::EntitySpawned { id, kind, glyph, x, y } => {
                renderer.spawn_entity(*id, *kind, glyph, *x, *y)
            }
            GameEvent::EntityMoved { id, x, y } => renderer.place_entity(*id, *x, *y),
            GameEvent::EntityRemoved { id, .. } => renderer.remove_entity(*id),
            GameEvent::Effect { effect, x, y } => renderer.show_effect(effect, *x, *y),
            other => renderer.display(other),
        }
    }
}
