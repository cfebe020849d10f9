use std::cell::Cell;
use std::rc::Rc;

/// A mutable scalar carrier shared between a producing neuron's output and
/// every downstream connection that reads it.
///
/// Cloning a `Signal` yields another handle to the same cell, not a copy of
/// the value. Single-writer discipline: only the producer (the owning neuron,
/// or the network for an external input slot) writes; consumers only read.
#[derive(Clone, Debug, Default)]
pub struct Signal(Rc<Cell<f64>>);

impl Signal {
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub(crate) fn set(&self, value: f64) {
        self.0.set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_visible_to_all_handles() {
        let source = Signal::new(0.0);
        let reader = source.clone();
        source.set(0.25);
        assert_eq!(0.25, reader.get());
    }
}
