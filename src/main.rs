use blockfile::{BlockId, FileMgr, FileResult, Page};
use clap::Parser;

#[derive(Parser, Debug)]
struct Config {
    /// Database directory
    #[clap(long, default_value = "filetest")]
    dir: String,
    /// Block size in bytes
    #[clap(long, default_value = "400")]
    blocksize: usize,
}

fn main() -> FileResult<()> {
    env_logger::init();
    let cfg = Config::parse();

    let fm = FileMgr::new(&cfg.dir, cfg.blocksize)?;
    println!("is_new: {}", fm.is_new());

    let blk = BlockId::new("testfile", 2);

    // write
    let mut p1 = Page::new(fm.block_size());
    let pos1 = 88;
    let s = "abcdefghijklm";
    p1.set_string(pos1, s)?;
    let pos2 = pos1 + Page::max_length(s.len());
    p1.set_int(pos2, 345)?;
    fm.write(&blk, &p1)?;

    // read
    let mut p2 = Page::new(fm.block_size());
    fm.read(&blk, &mut p2)?;
    println!("offset {} contains {}", pos2, p2.get_int(pos2)?);
    println!("offset {} contains {:?}", pos1, p2.get_string(pos1)?);

    fm.close_all()?;
    Ok(())
}
