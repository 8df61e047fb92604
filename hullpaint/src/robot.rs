use anyhow::{bail, Context, Result};
use libintcode::{Computer, RunOptions, StopReason, Value};
use log::{debug, warn};

use crate::hull::{Color, Hull};

/// A painting robot: an Intcode brain driving a hull, each feeding the
/// other's input channel.
#[derive(Debug)]
pub struct Robot {
    pub brain: Computer,
    pub hull: Hull,
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}

impl Robot {
    pub fn new() -> Self {
        Self::with_brain(Computer::named("robot"))
    }

    pub fn with_brain(mut brain: Computer) -> Self {
        let mut hull = Hull::new();
        brain.link(hull.input_channel());
        hull.link(brain.input_channel());
        Self { brain, hull }
    }

    /// Run `program` on a fresh hull whose first panel has color `start`.
    /// Alternates the brain and the hull until the brain halts and the hull
    /// has handled every command.
    pub fn paint(&mut self, program: &[Value], start: Color) -> Result<()> {
        self.hull.reset();
        let options = RunOptions::default().logging(false).loop_mode(true);
        self.brain
            .run(program, &[], options)
            .context("Robot program failed to start")?;
        self.hull.start(start);

        let mut rounds = 0u64;
        loop {
            self.hull.execute().context("Robot sent a bad command")?;
            if self.hull.finished() {
                break;
            }

            let stop = self.brain.resume().context("Robot program failed")?;
            rounds += 1;
            match stop {
                StopReason::Halted => {}
                StopReason::AwaitingInput => {
                    if self.hull.input_channel().len() < 2 {
                        warn!(
                            "robot starved at {} after {} rounds",
                            self.brain.pointer, rounds
                        );
                        bail!("Robot is waiting for input that will never arrive");
                    }
                }
                StopReason::CycleLimit => bail!("Robot program hit its cycle limit"),
            }
        }

        debug!(
            "robot painted {} panels in {} rounds",
            self.hull.painted_count(),
            rounds
        );
        Ok(())
    }
}

/// Paint a hull with `program`, starting on a panel of color `start`.
pub fn paint_hull(program: &[Value], start: Color) -> Result<Hull> {
    let mut robot = Robot::new();
    robot.paint(program, start)?;
    Ok(robot.hull)
}
