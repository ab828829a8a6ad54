use crate::CLAP_STYLING;
use clap::{arg, value_parser};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("webenum")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("webenum")
        .styles(CLAP_STYLING)
        .about(
            "Enumerate web directories using both recursive crawling and directory guessing.",
        )
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The URL to start from"),
        )
        .arg(arg!(-q --"quiet" "Only print found urls").required(false))
        .arg(
            arg!(-s --"allow-subdomains" "Allow subdomains of the seed host to be crawled")
                .required(false),
        )
        .arg(
            arg!(-p --"allow-other-ports" "Allow ports other than the seed's to be crawled")
                .required(false),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("Max depth to crawl and guess. URLs found at this depth are recorded but not explored. 0 for unlimited")
                .value_parser(value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            arg!(-b --"brute-force-depth" <DEPTH>)
                .required(false)
                .help("Max depth to guess directories at. 0 to follow --depth")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            arg!(-w --"wordlist" <PATH>)
                .required(false)
                .help("Newline-delimited wordlist for directory guessing. Guessing is off without it"),
        )
        .arg(
            arg!(-z --"check-all-urls" "Request every crawled link to record its status and size")
                .required(false),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Timeout for each request, in seconds")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-o --"out-file" <PATH>)
                .required(false)
                .help("Write found urls to a file"),
        )
        .arg(
            arg!(--"out-file-domains" <PATH>)
                .required(false)
                .help("Write found domains to a file"),
        )
        .arg(
            arg!(--"format" <FORMAT>)
                .required(false)
                .help("Output file format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-t --"threads" <THREADS>)
                .required(false)
                .help("Number of concurrent guesses")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
        .arg(arg!(-v --"no-verify-ssl" "Don't verify TLS certificates").required(false))
        .arg(arg!(-r --"follow-redirects" "Follow redirects").required(false))
        .arg(
            arg!(-a --"basic-auth" <CREDS>)
                .required(false)
                .help("Basic authentication credentials in the form user:pass"),
        )
        .arg(
            arg!(-c --"cookies" <COOKIES>)
                .required(false)
                .help("Cookies to send, in the form name:value,name1:value1"),
        )
        .arg(
            arg!(-f --"fail-cond" <TEXT>)
                .required(false)
                .help("Response body text that marks a page as not found"),
        )
}
