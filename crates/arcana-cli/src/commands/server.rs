use arcana_core::EngineConfig;

pub fn run(engine: &EngineConfig, host: &str, port: u16) -> super::CliResult {
    let base = format!("http://{host}:{port}");

    println!("🔮 Arcana Server v{}", arcana_core::VERSION);
    println!("   {base}");
    println!("   QRNG: {}", engine.qrng_url);
    println!();
    println!("   Endpoints:");
    println!("     GET  /                 API index (try: curl {base})");
    println!("     GET  /api/v1/reading   Draw a reading");
    println!("     POST /api/v1/verify    Re-derive a reading from its entropy");
    println!("     GET  /spreads          Built-in spreads");
    println!("     GET  /health           Health check with entropy counters");
    println!();
    println!("   Query params for /api/v1/reading:");
    println!("     spread=single|past-present-future|horseshoe|celtic-cross");
    println!("     deck=full|major   mode=quantum|cosmic   reversed=true|false   lang=fr|en");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/reading?spread=celtic-cross&lang=en'");
    println!("     curl -X POST -H 'content-type: application/json' -d @reading.json {base}/api/v1/verify");
    println!();

    super::runtime()?.block_on(arcana_server::run_server(engine, host, port))?;
    Ok(())
}
