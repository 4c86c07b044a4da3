use http::Method;
use routomaton::Router;

fn utf8(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

type Seen = Vec<(String, Vec<(String, String)>)>;

fn collect(router: &mut Router<Method, String>, path: &str) -> Seen {
    let mut seen = Seen::new();
    router.lookup(path.as_bytes(), |m| {
        let params = m.params.iter().map(|(k, v)| (utf8(k), utf8(v))).collect();
        seen.push((m.value.clone(), params));
        false
    });
    seen
}

macro_rules! match_tests {
    ($($name:ident {
        routes = $routes:expr,
        $( $path:literal => [
            $( $route:literal $( ( $( $key:literal => $val:literal ),+ ) )? ),* $(,)?
        ] ),* $(,)?
    }),* $(,)?) => { $(
        #[test]
        fn $name() {
            let mut router = Router::new();
            for route in $routes.iter() {
                router.add(Method::GET, *route, route.to_string()).unwrap();
            }

            $(
                let seen = collect(&mut router, $path);
                let expected: Seen = vec![$(
                    (
                        $route.to_string(),
                        vec![$($( ($key.to_string(), $val.to_string()) ),+)?],
                    )
                ),*];
                assert_eq!(seen, expected, "matches for path {:?}", $path);
            )*
        }
    )* };
}

match_tests! {
    literal_and_placeholder {
        routes = ["/test", "/a/:test", "/a/:test/"],
        "/" => [],
        "/test" => ["/test"],
        "/a/" => [],
        "/a/x" => ["/a/:test" ("test" => "x")],
        "/a/y/" => ["/a/:test/" ("test" => "y")],
        "/a/bc" => ["/a/:test" ("test" => "bc")],
    },
    overlapping_placeholders {
        routes = [":v1/:v2", "a/:v3", ":v4/b"],
        "a" => [],
        "a/a" => [
            ":v1/:v2" ("v1" => "a", "v2" => "a"),
            "a/:v3" ("v3" => "a"),
        ],
        "a/b" => [
            ":v1/:v2" ("v1" => "a", "v2" => "b"),
            "a/:v3" ("v3" => "b"),
            ":v4/b" ("v4" => "a"),
        ],
        "ab/bc" => [":v1/:v2" ("v1" => "ab", "v2" => "bc")],
    },
    literal_and_wildcard {
        routes = ["ab", "a*"],
        "a" => ["a*"],
        "ab" => ["ab", "a*"],
        "abc" => ["a*"],
    },
    wildcard_subtree {
        routes = ["foo/*"],
        "foo" => [],
        "fo" => [],
        "foo/" => ["foo/*"],
        "foo/x" => ["foo/*"],
        "foo/x/y/z" => ["foo/*"],
    },
    bare_wildcard {
        routes = ["/x", "*"],
        "" => ["*"],
        "/x" => ["/x", "*"],
        "/anything/at/all" => ["*"],
    },
    trailing_slash_is_significant {
        routes = ["/doc", "/doc/"],
        "/doc" => ["/doc"],
        "/doc/" => ["/doc/"],
        "/doc//" => [],
    },
    two_placeholders {
        routes = ["/info/:user/project/:project"],
        "/info/gordon/project/rust" => [
            "/info/:user/project/:project" ("user" => "gordon", "project" => "rust"),
        ],
        "/info/gordon/project" => [],
        "/info/gordon" => [],
    },
    placeholder_spill {
        routes = ["/:a/:b/:c/:d/:e"],
        "/1/2/3/4/5" => [
            "/:a/:b/:c/:d/:e" ("a" => "1", "b" => "2", "c" => "3", "d" => "4", "e" => "5"),
        ],
        "/1/2/3/4" => [],
    },
    mid_segment_placeholder {
        routes = ["/user_:name"],
        "/user_gordon" => ["/user_:name" ("name" => "gordon")],
        "/user_" => [],
        "/user" => [],
    },
    placeholder_stops_at_slash {
        routes = ["/files/:name"],
        "/files/a" => ["/files/:name" ("name" => "a")],
        "/files/a/b" => [],
        "/files/" => [],
    },
    placeholder_and_wildcard {
        routes = ["/files/:name", "/files/*"],
        "/files/a" => [
            "/files/:name" ("name" => "a"),
            "/files/*",
        ],
        "/files/" => ["/files/*"],
        "/files/a/b" => ["/files/*"],
    },
    static_route_shadowed_by_placeholder {
        routes = ["/v/:x/end", "/v/static/end"],
        "/v/static/end" => [
            "/v/:x/end" ("x" => "static"),
            "/v/static/end",
        ],
        "/v/other/end" => ["/v/:x/end" ("x" => "other")],
    },
    unicode_literals {
        routes = ["/ʯ", "/β", "/:sym"],
        "/ʯ" => ["/ʯ", "/:sym" ("sym" => "ʯ")],
        "/β" => ["/β", "/:sym" ("sym" => "β")],
        "/b" => ["/:sym" ("sym" => "b")],
    },
}

#[test]
fn visitor_stops_on_accept() {
    let mut router = Router::new();
    router.get("a*", 0).unwrap();
    router.get("ab", 1).unwrap();

    let mut visits = 0;
    let hit = router.lookup(b"ab", |_| {
        visits += 1;
        true
    });
    assert!(hit);
    assert_eq!(visits, 1);
}

#[test]
fn keys_are_exposed_to_the_visitor() {
    let mut router = Router::new();
    router.get("/x", "get").unwrap();
    router.post("/x", "post").unwrap();

    let mut picked = None;
    let hit = router.lookup(b"/x", |m| {
        if *m.key != Method::POST {
            return false;
        }
        picked = Some(*m.value);
        true
    });
    assert!(hit);
    assert_eq!(picked, Some("post"));
}

#[test]
fn duplicate_patterns_match_in_registration_order() {
    let mut router = Router::new();
    router.get("/dup", "first").unwrap();
    router.get("/dup", "second").unwrap();

    let mut seen = Vec::new();
    router.lookup(b"/dup", |m| {
        seen.push(*m.value);
        false
    });
    assert_eq!(seen, vec!["first", "second"]);
}

#[test]
fn matched_pattern_is_the_original_bytes() {
    let mut router = Router::new();
    router.get("/cmd/:tool", ()).unwrap();

    router.lookup(b"/cmd/vet", |m| {
        assert_eq!(m.pattern, b"/cmd/:tool");
        true
    });
}

#[test]
fn rebuild_is_idempotent() {
    let mut router = Router::new();
    router
        .get("/a/:x", "/a/:x".to_string())
        .unwrap()
        .get("/a/*", "/a/*".to_string())
        .unwrap();

    router.rebuild();
    let first = collect(&mut router, "/a/1");
    router.rebuild();
    let second = collect(&mut router, "/a/1");
    assert_eq!(first, second);
}

#[test]
fn lookups_do_not_affect_each_other() {
    let mut router = Router::new();
    router.get("/one/:x", "/one/:x".to_string()).unwrap();
    router.get("/two/*", "/two/*".to_string()).unwrap();

    let before = collect(&mut router, "/one/1");
    collect(&mut router, "/two/anything");
    collect(&mut router, "/nope");
    let after = collect(&mut router, "/one/1");
    assert_eq!(before, after);
}

#[test]
fn prefix_stripping_round_trip() {
    let mut router = Router::with_prefix("/api");
    router.get("/users/:id", ()).unwrap();

    let stripped = router.strip_prefix(b"/api/users/7").unwrap().to_vec();
    assert!(router.lookup(&stripped, |m| m.params.get("id") == Some(&b"7"[..])));

    assert_eq!(router.strip_prefix(b"/web/users/7"), None);
}
