use std::{env, process};

fn usage() {
    println!("httpclient [GET/POST] [URL]\n");
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let response = match &args[..] {
        [] => {
            usage();
            process::exit(1);
        }
        [verb, url] => httpclient::command(url, verb, None)?,
        [url, ..] => httpclient::command(url, "GET", None)?,
    };

    match response {
        Some(response) => println!("{response}"),
        None => println!("None"),
    }

    Ok(())
}
