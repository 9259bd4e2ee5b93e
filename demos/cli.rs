//! Ad hoc command-line driver for inspecting encoded output, the
//! spiritual equivalent of the fuzz harness's manual drivers mentioned in
//! `DESIGN.md`. Not part of the published library surface.

use std::io::{self, Read, Write};

use structopt::StructOpt;

use radix4::config::{ConfigBuilder, Mode};
use radix4::Codec;

#[derive(StructOpt)]
#[structopt(name = "radix4", about = "Encode or decode stdin as Radix4")]
struct Opt {
    /// Decode instead of encode
    #[structopt(short, long)]
    decode: bool,

    /// Use the streaming engine instead of the block engine
    #[structopt(short, long)]
    stream: bool,

    /// Disable the optimistic radix-free prefix
    #[structopt(long)]
    no_optimistic: bool,

    /// Append a terminator at the end of the stream
    #[structopt(long)]
    terminated: bool,

    /// Wrap output at this many characters (0 disables wrapping)
    #[structopt(long, default_value = "0")]
    line_length: usize,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let mode = if opt.stream { Mode::Stream } else { Mode::Block };
    let builder = match mode {
        Mode::Block => ConfigBuilder::block(),
        Mode::Stream => ConfigBuilder::stream(),
    };
    let config = builder
        .optimistic(!opt.no_optimistic)
        .terminated(opt.terminated)
        .line_length(opt.line_length)
        .build()
        .expect("CLI-constructed configuration is always valid");
    let codec = Codec::new(config);

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if opt.decode {
        let decoded = codec
            .decode_from_bytes(&input)
            .unwrap_or_else(|e| panic!("decode failed: {}", e));
        out.write_all(&decoded)?;
    } else {
        let encoded = codec
            .encode_to_bytes(&input)
            .unwrap_or_else(|e| panic!("encode failed: {}", e));
        out.write_all(&encoded)?;
    }

    Ok(())
}
