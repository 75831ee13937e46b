//! Developer tool: regenerates the `LUT` constant in `src/params.rs`.
//!
//! Not part of the library's public API -- run with `cargo run -p bloom
//! --example gen_lut` whenever `BLOCK_BITS`/`WORD_BITS`/`K` in
//! `params.rs` change and the table needs to be re-sampled. A Rust port of
//! `original_source/scripts/generate_lut.py`, specialised to this crate's
//! 256-bit block / 32-bit lane layout.

const BLOCK_BITS: f64 = 256.0;
const WORD_BITS: f64 = 32.0;
const K: i32 = 8;

fn fpr(c: f64) -> f64 {
    if c <= 0.0 {
        return 1.0;
    }
    let a = BLOCK_BITS / c;
    let p_miss = (WORD_BITS - 1.0) / WORD_BITS;
    let mut total = 0.0f64;
    let mut pmf = (-a).exp();
    let mut i: u32 = 0;
    loop {
        if i > 0 {
            pmf *= a / f64::from(i);
        }
        let p_bit_set = 1.0 - p_miss.powi(i as i32);
        total += pmf * p_bit_set.powi(K);
        if pmf < 1e-15 && f64::from(i) > a {
            break;
        }
        i += 1;
        if i > 100_000 {
            break;
        }
    }
    total
}

fn bisect(target: f64) -> f64 {
    let (mut lo, mut hi) = (0.5f64, 300.0f64);
    while hi - lo > 1e-8 {
        let mid = (lo + hi) / 2.0;
        if fpr(mid) > target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

fn main() {
    let x_min = 1.0f64;
    let x_max = 20.0f64;
    let step = 0.5f64;

    let mut entries = Vec::new();
    let mut x = x_min;
    while x <= x_max + 1e-9 {
        let target_fp = 2.0f64.powf(-x);
        entries.push((x, bisect(target_fp)));
        x += step;
    }

    println!("// Regenerate with: cargo run -p bloom --example gen_lut");
    println!("const LUT: [f32; {}] = [", entries.len());
    for chunk in entries.chunks(8) {
        let line: Vec<String> = chunk.iter().map(|(_, c)| format!("{c:.6}")).collect();
        println!("    {},", line.join(", "));
    }
    println!("];");
}
