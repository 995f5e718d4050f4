// Fan-out writer: every write is replicated to all sinks

use std::io::{self, Write};

/// Writer that duplicates its input to every registered sink, in order
#[derive(Default)]
pub struct Tee<'a> {
    sinks: Vec<&'a mut (dyn Write + Send)>,
}

impl<'a> Tee<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sink(mut self, sink: &'a mut (dyn Write + Send)) -> Self {
        self.push(sink);
        self
    }

    pub fn push(&mut self, sink: &'a mut (dyn Write + Send)) {
        self.sinks.push(sink);
    }
}

impl Write for Tee<'_> {
    /// Writes the whole buffer to each sink; a short write is never reported,
    /// so all sinks stay byte-identical as long as no error occurs.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in self.sinks.iter_mut() {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}
