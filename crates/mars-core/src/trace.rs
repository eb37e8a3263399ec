//! Execution trace hooks.
//!
//! The engine reports every executed instruction and every destination
//! write through a [`TraceSink`]. The default [`NullTrace`] discards
//! everything; [`FileTrace`] appends the textual log the debugging
//! tools consume. Sinks are owned per tournament so traced runs stay
//! thread-independent.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::instruction::Instruction;

/// Resolved operand context for one executed instruction.
#[derive(Debug, Clone, Copy)]
pub struct ExecOperands<'a> {
    /// Effective A-operand address.
    pub a_addr: i32,
    /// Source instruction the A-operand produced.
    pub src: &'a Instruction,
    /// Write-side B-operand address.
    pub b_addr: i32,
    /// Destination snapshot before the opcode ran.
    pub dst_before: &'a Instruction,
}

/// Receiver for engine events.
pub trait TraceSink {
    /// A fresh round is starting; file sinks truncate here.
    fn begin_round(&mut self);

    /// One instruction was fetched and its operands resolved.
    ///
    /// `operands` is `None` for a DAT fetch, which kills the process
    /// before any operand is evaluated.
    fn record_exec(&mut self, pc: i32, instr: &Instruction, operands: Option<ExecOperands<'_>>);

    /// The opcode committed `value` into the cell at `addr`.
    fn record_write(&mut self, addr: i32, value: &Instruction);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn begin_round(&mut self) {}

    fn record_exec(&mut self, _pc: i32, _instr: &Instruction, _operands: Option<ExecOperands<'_>>) {
    }

    fn record_write(&mut self, _addr: i32, _value: &Instruction) {}
}

/// Appends events to a text file, truncating it at each round start.
///
/// I/O failures after creation are swallowed: tracing is diagnostic and
/// must never alter battle outcomes.
#[derive(Debug)]
pub struct FileTrace {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileTrace {
    /// Creates (or truncates) the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self {
            path,
            writer: Some(writer),
        })
    }
}

impl TraceSink for FileTrace {
    fn begin_round(&mut self) {
        // Dropping the previous writer flushes it before the truncate.
        self.writer = None;
        self.writer = File::create(&self.path).ok().map(BufWriter::new);
    }

    fn record_exec(&mut self, pc: i32, instr: &Instruction, operands: Option<ExecOperands<'_>>) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let _ = match operands {
            Some(ops) => writeln!(
                writer,
                "PC={pc} {instr} | A={} {{{}}}, B={} {{{}}}",
                ops.a_addr, ops.src, ops.b_addr, ops.dst_before
            ),
            None => writeln!(writer, "PC={pc} {instr}"),
        };
    }

    fn record_write(&mut self, addr: i32, value: &Instruction) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let _ = writeln!(writer, "  -> WRITE @{addr} {{{value}}}");
    }
}
