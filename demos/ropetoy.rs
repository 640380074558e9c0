// Copyright 2016 The xi-editor Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use byte_rope::Rope;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ropetoy", about = "Play with a byte rope")]
struct Cli {
    /// Initial content of the rope
    #[arg(default_value = "hello.")]
    text: String,

    /// Number of numbered lines to append
    #[arg(short, long, default_value_t = 1000)]
    rounds: usize,

    /// Byte range to delete afterwards, e.g. 5..20
    #[arg(short, long, value_parser = parse_range)]
    delete: Option<(usize, usize)>,

    /// Print the tree structure after the edits
    #[arg(long)]
    tree: bool,
}

fn parse_range(s: &str) -> Result<(usize, usize)> {
    let (from, to) = s
        .split_once("..")
        .with_context(|| format!("expected FROM..TO, got {:?}", s))?;
    Ok((from.trim().parse()?, to.trim().parse()?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut a = Rope::from(cli.text.as_str());
    if let Some(last) = a.len().checked_sub(1) {
        a.edit(last..a.len(), b"!")?;
    }
    for i in 0..cli.rounds {
        let end = a.normalize(-1)?;
        a.insert(end, (i.to_string() + "\n").as_bytes())?;
    }
    if let Some((from, to)) = cli.delete {
        a.delete(from, to)
            .with_context(|| format!("deleting {}..{}", from, to))?;
    }
    if cli.tree {
        print!("{}", a.tree());
    }
    for (i, chunk) in a.chunks().filter(|c| !c.is_empty()).take(3).enumerate() {
        println!("chunk {}: {:?}", i, String::from_utf8_lossy(chunk));
    }
    println!(
        "len={} depth={} lines={}",
        a.len(),
        a.depth(),
        a.line_count()
    );
    a.compact()?;
    println!("{:?}", String::from_utf8_lossy(&a.flatten()?));
    Ok(())
}
