//! Interactive simulation REPL
//!
//! Drives the simulated world and the poll service from a prompt:
//! membership churn, zone clocks, manual polls and ballots. Broadcasts
//! from the console messenger interleave with the prompt, which is the
//! point: the poll lives its own life on the service loop.

use anyhow::Result;
use colored::Colorize;
use nightpoll_application::ports::zone::{Zone, ZoneRegistry};
use nightpoll_application::{PollConfig, PollHandle};
use nightpoll_domain::{Ballot, DayPhase, ParticipantId, ZoneName};
use nightpoll_infrastructure::SimWorld;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Arc;

/// Interactive driver for the simulated world
pub struct SimRepl {
    world: Arc<SimWorld>,
    handle: PollHandle,
    config: PollConfig,
}

impl SimRepl {
    pub fn new(world: Arc<SimWorld>, handle: PollHandle, config: PollConfig) -> Self {
        Self {
            world,
            handle,
            config,
        }
    }

    /// Run the prompt until `exit` or end of input.
    pub async fn run(&self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        self.print_welcome();

        loop {
            match rl.readline("nightpoll> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    let words: Vec<&str> = line.split_whitespace().collect();
                    if self.dispatch(&words).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("input error: {err}");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Handle one command line; returns true to exit.
    async fn dispatch(&self, words: &[&str]) -> bool {
        match words {
            ["exit"] | ["quit"] => return true,
            ["help"] => self.print_help(),
            ["status"] => self.print_status().await,
            ["zones"] => self.print_zones(),

            ["join", who, zone] => {
                let id = ParticipantId::new(*who);
                let zone = ZoneName::new(*zone);
                if self.world.join(&id, &zone) {
                    self.handle.zone_entered(id, zone);
                } else {
                    self.warn("cannot join: unknown zone, or participant already present");
                }
            }
            ["leave", who] => {
                let id = ParticipantId::new(*who);
                match self.world.quit(&id) {
                    Some(from) => self.handle.leave(id, from),
                    None => self.warn("no such participant"),
                }
            }
            ["move", who, to] => {
                let id = ParticipantId::new(*who);
                let to = ZoneName::new(*to);
                match self.world.transfer(&id, &to) {
                    Some(from) => {
                        self.handle.zone_change(id.clone(), from);
                        self.handle.zone_entered(id, to);
                    }
                    None => self.warn("cannot move: unknown target or participant"),
                }
            }

            ["vote", who, choice] => match choice.parse::<Ballot>() {
                Ok(ballot) => self.handle.cast_vote(ParticipantId::new(*who), ballot),
                Err(err) => self.warn(&err),
            },
            ["start", zone] => {
                // No initiator means nobody receives the refusal message
                if !self.handle.start(ZoneName::new(*zone), None).await {
                    self.warn("poll did not start");
                }
            }
            ["start", zone, who] => {
                self.handle
                    .start(ZoneName::new(*zone), Some(ParticipantId::new(*who)))
                    .await;
            }
            ["cancel"] => {
                if !self.handle.cancel(None).await {
                    self.warn("no poll to cancel");
                }
            }

            ["clock", zone] => match self.world.sim_zone(&ZoneName::new(*zone)) {
                Some(z) => self.print_clock(*zone, z.clock()),
                None => self.warn("unknown zone"),
            },
            ["advance", zone, ticks] => {
                let Ok(ticks) = ticks.parse::<i64>() else {
                    self.warn("ticks must be an integer");
                    return false;
                };
                match self.world.sim_zone(&ZoneName::new(*zone)) {
                    Some(z) => {
                        let now = z.advance_clock(ticks);
                        self.print_clock(*zone, now);
                    }
                    None => self.warn("unknown zone"),
                }
            }

            ["reset", zone] => self.handle.reset_attempt_cycle(ZoneName::new(*zone)),
            ["reset"] => self.handle.reset_all_attempt_cycles(),
            ["reload"] => self.handle.reload(),

            _ => self.warn("unknown command, try `help`"),
        }
        false
    }

    fn print_welcome(&self) {
        println!("{}", "nightpoll simulation".bold());
        println!(
            "night starts at tick {}, polls run {}s, type `help` for commands",
            self.config.night_start_tick, self.config.duration_secs
        );
    }

    fn print_help(&self) {
        println!("world:  join <who> <zone> | leave <who> | move <who> <zone> | zones");
        println!("clock:  clock <zone> | advance <zone> <ticks>");
        println!("poll:   start <zone> [who] | vote <who> y|n | cancel | status");
        println!("admin:  reset [zone] | reload | exit");
    }

    async fn print_status(&self) {
        match self.handle.status().await {
            Some(status) if status.is_active() => {
                let zone = status.zone.expect("active status carries a zone").to_string();
                println!(
                    "poll active in {}: {}/{} ballots in",
                    zone.as_str().magenta(),
                    status.votes,
                    status.eligible
                );
            }
            Some(status) => {
                println!(
                    "no active poll, {} zone(s) attempted this cycle",
                    status.flagged_zones
                );
            }
            None => self.warn("poll service is not running"),
        }
    }

    fn print_zones(&self) {
        for zone in self.world.zones() {
            let phase = DayPhase::from_tick(zone.clock(), self.config.night_start_tick);
            let name = zone.name().to_string();
            println!(
                "{}  clock {:>5} ({})  {} participant(s){}",
                name.as_str().magenta(),
                zone.clock(),
                phase,
                zone.participants().len(),
                if zone.is_votable() { "" } else { "  [no polls]" }
            );
        }
    }

    fn print_clock(&self, zone: &str, tick: i64) {
        let phase = DayPhase::from_tick(tick, self.config.night_start_tick);
        println!("{zone} clock is {tick} ({phase})");
    }

    fn warn(&self, message: &str) {
        println!("{} {}", "!".red(), message);
    }
}
