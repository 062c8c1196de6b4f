// demos/line_reading.rs
//! Reads a stream through small pooled blocks, tallying the first byte of
//! every line and reassembling lines that straddle block boundaries.
//!
//! Each block is filled by successive reads until it reports full; only then
//! is it handed back and a fresh one taken. Every read becomes a view of just
//! the bytes it produced.
//!
//! Run with a file argument, or without one to use a built-in sample:
//! `cargo run --example line_reading -- /usr/share/dict/words`

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use zerobuf::prelude::*;

const SAMPLE: &[u8] = b"apple\n\
apricot\n\
banana\n\
blueberry\n\
cherry\n\
\n\
cranberry\n\
damson\n\
elderberry\n\
trailing line without terminator";

fn open_input() -> Result<Box<dyn Read>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(Cursor::new(SAMPLE))),
    }
}

/// Counts one line by its first byte; empty lines are counted separately.
fn tally(counts: &mut BTreeMap<Option<u8>, usize>, line: &View) {
    *counts.entry(line.byte_at(0)).or_default() += 1;
}

fn main() -> Result<()> {
    println!("=== Line Reading Through Pooled Blocks ===\n");

    // Deliberately tiny blocks so most lines span several reads
    let mut pool = BufferPool::new(PoolConfig {
        block_size: 16,
        capacity: 4,
        zero_on_release: false,
    });
    let mut input = open_input()?;
    let mut pending = Collator::new();
    let mut counts = BTreeMap::new();
    let mut lines = 0;

    let mut block = pool.acquire();
    let mut last_pos = 0;

    loop {
        let read = match block.read_from(&mut input) {
            Ok(read) => read,
            Err(BufferError::BufferFull) => {
                // Blocks still referenced by pending views are dropped, not recycled
                pool.release(block);
                block = pool.acquire();
                last_pos = 0;
                continue;
            }
            Err(BufferError::EndOfStream) => break,
            Err(e) => return Err(e),
        };
        let view = block.view(last_pos..last_pos + read)?;
        last_pos += read;
        pending.append(view.clone());

        if view.contains(b"\n") {
            let data = pending.collapse();
            let Some(nl) = data.rfind(b"\n") else {
                continue;
            };
            for line in data.slice(..nl)?.split(b"\n")? {
                tally(&mut counts, &line);
                lines += 1;
            }
            pending.append(data.slice(nl + 1..)?);
        }
    }

    let rest = pending.collapse();
    if !rest.is_empty() {
        tally(&mut counts, &rest);
        lines += 1;
    }
    pool.release(block);

    println!("Lines read: {}", lines);
    for (first, count) in &counts {
        match first {
            Some(byte) => println!("  {:?}: {}", char::from(*byte), count),
            None => println!("  (empty): {}", count),
        }
    }

    let stats = pool.stats();
    println!("\n=== Pool Statistics ===\n");
    println!("Blocks acquired: {}", stats.acquired);
    println!("Blocks allocated: {}", stats.allocated);
    println!("Blocks discarded: {}", stats.discarded);
    println!("Free after run: {}", stats.available);
    println!("Hit rate: {:.1}%", stats.hit_rate());

    Ok(())
}
