//! Virtual-time timers. The session asks for everything due up to `now` on
//! each tick instead of registering browser callbacks, so tests can drive
//! time by hand.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SpawnBug,
    SpawnBomb,
    SpawnPowerUp,
    PowerUpTick,
    EndSession,
    EndKonamiMode,
}

/// What a periodic timer does when several periods elapsed between two
/// `due` calls (e.g. after the tab was hidden).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatchUp {
    /// Fire once per missed period.
    Every,
    /// Fire once, then realign the next deadline to `now`.
    Once,
}

#[derive(Clone, Debug)]
struct Periodic {
    command: Command,
    interval_ms: f64,
    next_due_ms: f64,
    catch_up: CatchUp,
}

#[derive(Clone, Debug)]
struct Delayed {
    due_ms: f64,
    command: Command,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    periodic: Vec<Periodic>,
    delayed: Vec<Delayed>,
}

impl Scheduler {
    /// Fire `command` every `interval_ms`, first at `start_ms + interval_ms`.
    /// Non-positive or non-finite intervals register nothing.
    pub fn every(&mut self, command: Command, interval_ms: f64, start_ms: f64, catch_up: CatchUp) {
        if !(interval_ms.is_finite() && interval_ms > 0.0) {
            return;
        }
        self.periodic.push(Periodic {
            command,
            interval_ms,
            next_due_ms: start_ms + interval_ms,
            catch_up,
        });
    }

    pub fn after(&mut self, now_ms: f64, delay_ms: f64, command: Command) {
        self.delayed.push(Delayed {
            due_ms: now_ms + delay_ms.max(0.0),
            command,
        });
    }

    /// Drop pending one-shot occurrences of `command`.
    pub fn cancel(&mut self, command: Command) {
        self.delayed.retain(|d| d.command != command);
    }

    pub fn is_pending(&self, command: Command) -> bool {
        self.delayed.iter().any(|d| d.command == command)
    }

    pub fn clear(&mut self) {
        self.periodic.clear();
        self.delayed.clear();
    }

    /// Everything due at or before `now_ms`, in deadline order. Ties keep
    /// registration order, periodic timers first.
    pub fn due(&mut self, now_ms: f64) -> Vec<Command> {
        let mut fired: Vec<(f64, Command)> = Vec::new();

        for timer in &mut self.periodic {
            match timer.catch_up {
                CatchUp::Every => {
                    while timer.next_due_ms <= now_ms {
                        fired.push((timer.next_due_ms, timer.command));
                        timer.next_due_ms += timer.interval_ms;
                    }
                }
                CatchUp::Once => {
                    if timer.next_due_ms <= now_ms {
                        fired.push((timer.next_due_ms, timer.command));
                        timer.next_due_ms += timer.interval_ms;
                        if timer.next_due_ms <= now_ms {
                            timer.next_due_ms = now_ms + timer.interval_ms;
                        }
                    }
                }
            }
        }

        let mut pending = Vec::with_capacity(self.delayed.len());
        for d in self.delayed.drain(..) {
            if d.due_ms <= now_ms {
                fired.push((d.due_ms, d.command));
            } else {
                pending.push(d);
            }
        }
        self.delayed = pending;

        fired.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.into_iter().map(|(_, c)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_fires_on_interval_boundaries() {
        let mut s = Scheduler::default();
        s.every(Command::SpawnBug, 2_500.0, 0.0, CatchUp::Once);
        assert!(s.due(2_499.0).is_empty());
        assert_eq!(s.due(2_500.0), vec![Command::SpawnBug]);
        assert!(s.due(4_999.0).is_empty());
        assert_eq!(s.due(5_000.0), vec![Command::SpawnBug]);
    }

    #[test]
    fn every_catches_up_each_missed_period() {
        let mut s = Scheduler::default();
        s.every(Command::PowerUpTick, 100.0, 0.0, CatchUp::Every);
        assert_eq!(s.due(1_050.0).len(), 10);
        assert_eq!(s.due(1_100.0), vec![Command::PowerUpTick]);
    }

    #[test]
    fn once_realigns_after_a_long_pause() {
        let mut s = Scheduler::default();
        s.every(Command::SpawnBug, 1_000.0, 0.0, CatchUp::Once);
        assert_eq!(s.due(60_000.0), vec![Command::SpawnBug]);
        assert!(s.due(60_999.0).is_empty());
        assert_eq!(s.due(61_000.0), vec![Command::SpawnBug]);
    }

    #[test]
    fn delayed_commands_fire_once_in_deadline_order() {
        let mut s = Scheduler::default();
        s.after(0.0, 1_000.0, Command::EndSession);
        s.after(0.0, 500.0, Command::EndKonamiMode);
        assert!(s.is_pending(Command::EndSession));
        assert_eq!(s.due(1_000.0), vec![Command::EndKonamiMode, Command::EndSession]);
        assert!(s.due(5_000.0).is_empty());
        assert!(!s.is_pending(Command::EndSession));
    }

    #[test]
    fn mixed_sources_are_merged_by_time() {
        let mut s = Scheduler::default();
        s.every(Command::PowerUpTick, 100.0, 0.0, CatchUp::Every);
        s.after(0.0, 150.0, Command::EndSession);
        assert_eq!(
            s.due(250.0),
            vec![Command::PowerUpTick, Command::EndSession, Command::PowerUpTick]
        );
    }

    #[test]
    fn cancel_and_invalid_intervals() {
        let mut s = Scheduler::default();
        s.every(Command::SpawnBomb, 0.0, 0.0, CatchUp::Once);
        s.every(Command::SpawnBomb, f64::NAN, 0.0, CatchUp::Once);
        s.after(0.0, 10.0, Command::EndKonamiMode);
        s.cancel(Command::EndKonamiMode);
        assert!(s.due(1_000_000.0).is_empty());
    }
}
