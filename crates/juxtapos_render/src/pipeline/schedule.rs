//! The peel-and-composite step sequence
//!
//! One frame is a fixed list of steps:
//!
//! 1. clear the output target to the background color
//! 2. prime: clear the depth of target 1 (the read target of pass 0) to 1.0
//! 3. for each pass `p` in `0..P`: peel into target `p % 2` while reading the
//!    depth of the other target, then composite target `p % 2` onto the output
//!
//! The read target of pass `p` is always the write target of pass `p - 1`, so
//! each pass keeps the farthest fragment strictly nearer than the layer peeled
//! just before it. Layers are composited farthest first.

/// One of the two targets of a [`FramebufferPair`](crate::framebuffer::FramebufferPair)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    Zero,
    One,
}

impl TargetSlot {
    /// Write target of pass `pass`
    #[inline]
    pub fn for_pass(pass: u32) -> Self {
        if pass % 2 == 0 {
            TargetSlot::Zero
        } else {
            TargetSlot::One
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            TargetSlot::Zero => TargetSlot::One,
            TargetSlot::One => TargetSlot::Zero,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            TargetSlot::Zero => 0,
            TargetSlot::One => 1,
        }
    }
}

/// A single step of the frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeelStep {
    /// Clear the output target to the background color
    ClearOutput,
    /// Clear `target`'s depth to the far value so the first pass reads "nothing peeled yet"
    PrimeDepth { target: TargetSlot },
    /// Draw the faces into `write` (greater-than depth test, depth cleared to 0.0)
    /// discarding fragments not nearer than `read`'s depth
    Peel {
        pass: u32,
        write: TargetSlot,
        read: TargetSlot,
    },
    /// Blend `source`'s color over the output target
    Composite { pass: u32, source: TargetSlot },
}

/// Precomputed step sequence for a fixed pass count
#[derive(Clone, Debug)]
pub struct PeelSchedule {
    passes: u32,
    steps: Vec<PeelStep>,
}

impl PeelSchedule {
    /// Build the schedule for `passes` peel passes
    ///
    /// # Panics
    /// If `passes` is zero.
    pub fn new(passes: u32) -> Self {
        assert!(passes > 0, "depth peeling needs at least one pass");

        let mut steps = Vec::with_capacity(2 + 2 * passes as usize);
        steps.push(PeelStep::ClearOutput);
        steps.push(PeelStep::PrimeDepth {
            target: TargetSlot::for_pass(0).other(),
        });

        for pass in 0..passes {
            let write = TargetSlot::for_pass(pass);
            steps.push(PeelStep::Peel {
                pass,
                write,
                read: write.other(),
            });
            steps.push(PeelStep::Composite {
                pass,
                source: write,
            });
        }

        Self { passes, steps }
    }

    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    #[inline]
    pub fn steps(&self) -> &[PeelStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_count() {
        let schedule = PeelSchedule::new(8);
        assert_eq!(schedule.passes(), 8);
        assert_eq!(schedule.steps().len(), 18);
    }

    #[test]
    fn test_prologue() {
        let schedule = PeelSchedule::new(8);
        assert_eq!(schedule.steps()[0], PeelStep::ClearOutput);
        assert_eq!(schedule.steps()[1], PeelStep::PrimeDepth { target: TargetSlot::One });
    }

    #[test]
    fn test_targets_alternate_by_parity() {
        let schedule = PeelSchedule::new(8);
        let peels: Vec<_> = schedule
            .steps()
            .iter()
            .filter_map(|s| match *s {
                PeelStep::Peel { pass, write, read } => Some((pass, write, read)),
                _ => None,
            })
            .collect();

        assert_eq!(peels.len(), 8);
        for (n, &(pass, write, read)) in peels.iter().enumerate() {
            assert_eq!(pass, n as u32);
            assert_eq!(write.index(), n % 2);
            assert_eq!(read.index(), (n + 1) % 2);
            assert_ne!(write, read);
        }
    }

    #[test]
    fn test_read_target_is_previous_write() {
        let schedule = PeelSchedule::new(5);
        let mut previous_write = None;
        for step in schedule.steps() {
            match *step {
                PeelStep::PrimeDepth { target } => previous_write = Some(target),
                PeelStep::Peel { write, read, .. } => {
                    assert_eq!(Some(read), previous_write);
                    previous_write = Some(write);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_each_peel_followed_by_its_composite() {
        let schedule = PeelSchedule::new(8);
        for pair in schedule.steps()[2..].chunks(2) {
            match (pair[0], pair[1]) {
                (PeelStep::Peel { pass, write, .. }, PeelStep::Composite { pass: cp, source }) => {
                    assert_eq!(pass, cp);
                    assert_eq!(write, source);
                }
                other => panic!("unexpected step pair {:?}", other),
            }
        }
    }

    #[test]
    fn test_single_pass() {
        let schedule = PeelSchedule::new(1);
        assert_eq!(
            schedule.steps(),
            &[
                PeelStep::ClearOutput,
                PeelStep::PrimeDepth { target: TargetSlot::One },
                PeelStep::Peel { pass: 0, write: TargetSlot::Zero, read: TargetSlot::One },
                PeelStep::Composite { pass: 0, source: TargetSlot::Zero },
            ]
        );
    }

    #[test]
    #[should_panic]
    fn test_zero_passes_rejected() {
        PeelSchedule::new(0);
    }
}
