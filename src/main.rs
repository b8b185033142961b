use std::time::{Duration, Instant};

use threshold_pre::{
    decrypt_reencrypted, encrypt, generate_key_fragments, re_encapsulate, setup, KeyPair, Params,
    Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Default, Clone, Debug)]
struct Timings {
    total: Duration,
    keygen: Duration,
    encrypt: Duration,
    kfrags: Duration,
    reencrypt: Duration,
    verify: Duration,
    decrypt: Duration,
}

fn add(a: &mut Duration, b: Duration) { *a += b; }

fn avg(d: Duration, n: usize) -> Duration {
    if n == 0 { d } else { Duration::from_nanos((d.as_nanos() / n as u128) as u64) }
}

fn run_once(par: &Params, n: usize, t: usize) -> Result<(Timings, bool)> {
    let total_start = Instant::now();
    let mut tm = Timings::default();

    let start = Instant::now();
    let alice = KeyPair::random()?;
    let bob = KeyPair::random()?;
    tm.keygen = start.elapsed();

    let msg = b"hello threshold proxy re-encryption";

    let start = Instant::now();
    let (capsule, envelope) = encrypt(alice.public(), msg)?;
    tm.encrypt = start.elapsed();

    let start = Instant::now();
    let kfrags = generate_key_fragments(par, alice.secret(), bob.public(), n, t)?;
    tm.kfrags = start.elapsed();

    // one proxy per fragment, only the first t answer
    let start = Instant::now();
    let cfrags = kfrags
        .iter()
        .take(t)
        .map(|k| re_encapsulate(par, k, &capsule, b"bench"))
        .collect::<Result<Vec<_>>>()?;
    tm.reencrypt = start.elapsed();

    let start = Instant::now();
    let verified = cfrags.iter().all(|c| c.verify(par, capsule.e(), capsule.v()));
    tm.verify = start.elapsed();

    let start = Instant::now();
    let opened = decrypt_reencrypted(bob.secret(), alice.public(), &cfrags, &envelope)?;
    tm.decrypt = start.elapsed();

    tm.total = total_start.elapsed();

    Ok((tm, verified && opened == msg))
}

fn run_exp(par: &Params, n: usize, t: usize, reps: usize) -> Result<()> {
    let mut sum = Timings::default();
    let mut ok = true;

    for _ in 0..reps {
        let (tm, good) = run_once(par, n, t)?;
        ok &= good;
        add(&mut sum.total, tm.total);
        add(&mut sum.keygen, tm.keygen);
        add(&mut sum.encrypt, tm.encrypt);
        add(&mut sum.kfrags, tm.kfrags);
        add(&mut sum.reencrypt, tm.reencrypt);
        add(&mut sum.verify, tm.verify);
        add(&mut sum.decrypt, tm.decrypt);
    }

    if !ok {
        error!(n, t, "round trip did not recover the plaintext");
    }

    println!(
        "RESULT,n={},t={},reps={},ok={},total_ms={:.3},keygen_ms={:.3},encrypt_ms={:.3},kfrags_ms={:.3},reencrypt_ms={:.3},verify_ms={:.3},decrypt_ms={:.3}",
        n, t, reps, ok,
        avg(sum.total, reps).as_secs_f64() * 1e3,
        avg(sum.keygen, reps).as_secs_f64() * 1e3,
        avg(sum.encrypt, reps).as_secs_f64() * 1e3,
        avg(sum.kfrags, reps).as_secs_f64() * 1e3,
        avg(sum.reencrypt, reps).as_secs_f64() * 1e3,
        avg(sum.verify, reps).as_secs_f64() * 1e3,
        avg(sum.decrypt, reps).as_secs_f64() * 1e3,
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let par = setup();
    let reps = 10;
    info!(reps, "starting re-encryption sweep");

    for n in [8, 16, 32, 64] {
        run_exp(&par, n, n / 2, reps)?;
    }

    let n = 64;
    for t in [1, 4, 8, 16, 32] {
        run_exp(&par, n, t, reps)?;
    }
    Ok(())
}
