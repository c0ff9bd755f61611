#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use voteweb_admission::VoteRequest;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    group: &'a str,
    slug: &'a str,
    identity: &'a str,
    user_agent: Option<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let request = VoteRequest::new(input.group, input.slug, input.identity, input.user_agent);
    if request.validate().is_ok() {
        assert!(!input.group.is_empty());
        assert!(!input.slug.is_empty());
        assert!(!input.identity.is_empty());
    }
});
