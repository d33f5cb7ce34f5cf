//! Walker-level properties: idempotence, version monotonicity, and a
//! whole-file transformation check.

#![allow(clippy::unwrap_used)]

use dtsdown::resolver::SymbolResolver;
use dtsdown::rules::{RewriteContext, RuleSet};
use dtsdown::test_utils::{downlevel_str, parse_str};
use dtsdown::version::{TargetVersion, VersionGate};
use dtsdown::walker::TreeWalker;
use std::collections::BTreeSet;

/// Exercises every rule at least once.
const KITCHEN_SINK: &str = "\
/// <reference types=\"node\" />
export class C {
  protected get p(): number;
  protected set p(value: number);
  public get q(): string;
  private set r(value: boolean);
}
export namespace N {
  abstract class D {
    get p(): number;
    set p(value: number);
  }
}
import type { C as CD } from \"./src/test\";
// another comment
export * as rex from \"./src/test\";
export interface E {
  a: number;
  b: number;
}
export type F = Omit<E, 'a'>
export class G {
    #private
}
export class H extends G {
    #private
}
export interface I extends Omit<E, 'a'> {
    version: number;
}
declare function guardIsString(val: any): val is string;
declare function assertIsString(val: any, msg?: string): asserts val is string;
type J = [foo: string, bar: number, ...arr: boolean[]]
";

fn fired_rules(source: &str, target: &str) -> BTreeSet<&'static str> {
    let mut tree = parse_str(source);
    let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
    let rules = RuleSet::standard();
    let walker = TreeWalker::new(&rules);
    let ctx = RewriteContext {
        gate: VersionGate::new(target.parse::<TargetVersion>().unwrap()),
        resolver: &resolver,
    };
    let outcome = walker.walk_file(&mut tree, &ctx).unwrap();
    outcome.fired.keys().copied().collect()
}

#[test]
fn test_whole_file_transformation_at_3_4() {
    let out = downlevel_str(KITCHEN_SINK, "3.4");
    let expected = "\
/// <reference types=\"node\" />
export class C {
    protected p: number;
    public readonly q: string;
    private r: boolean;
}
export namespace N {
    abstract class D {
        p: number;
    }
}
import { C as CD } from \"./src/test\";
import * as rex_1 from \"./src/test\";
//another comment
export { rex_1 as rex };
export interface E {
    a: number;
    b: number;
}
export type F = Pick<E, Exclude<keyof E, 'a'>>;
export class G {
    private \"G.#private\";
}
export class H extends G {
    private \"H.#private\";
}
export interface I extends Pick<E, Exclude<keyof E, 'a'>> {
    version: number;
}
declare function guardIsString(val: any): val is string;
declare function assertIsString(val: any, msg?: string): void;
type J = [
    /*foo*/ string,
    /*bar*/ number,
    /*arr*/ ...boolean[]
];
";
    assert_eq!(out, expected);
}

#[test]
fn test_idempotent_on_own_output() {
    for target in ["3.4", "3.6", "3.7", "3.9"] {
        let once = downlevel_str(KITCHEN_SINK, target);
        let twice = downlevel_str(&once, target);
        assert_eq!(once, twice, "second run at {target} changed the output");
    }
}

#[test]
fn test_lower_targets_fire_superset_of_rules() {
    let targets = ["3.4", "3.5", "3.6", "3.7", "3.8", "4.0", "4.2"];
    let sets: Vec<BTreeSet<&'static str>> = targets
        .iter()
        .map(|t| fired_rules(KITCHEN_SINK, t))
        .collect();
    for window in sets.windows(2) {
        assert!(
            window[0].is_superset(&window[1]),
            "rule set shrank non-monotonically: {:?} vs {:?}",
            window[0],
            window[1]
        );
    }
    // The lowest target fires everything the input exercises.
    let all: BTreeSet<&'static str> = [
        "accessor-get",
        "accessor-set",
        "type-only-import",
        "namespace-reexport",
        "private-field",
        "utility-type",
        "asserts-return",
        "named-tuple",
    ]
    .into_iter()
    .collect();
    assert_eq!(sets[0], all);
    // And the highest fires nothing.
    assert!(sets[sets.len() - 1].is_empty());
}

#[test]
fn test_version_gate_boundaries_per_rule() {
    let cases = [
        ("export class C {\n    get p(): number;\n}\n", "accessor-get", "3.5", "3.6"),
        ("export class G {\n    #private\n}\n", "private-field", "3.7", "3.8"),
        ("export type F = Omit<E, 'a'>;\n", "utility-type", "3.4", "3.5"),
        ("type J = [foo: string];\n", "named-tuple", "3.9", "4.0"),
        (
            "declare function assert(val: any): asserts val;\n",
            "asserts-return",
            "3.6",
            "3.7",
        ),
    ];
    for (source, rule, below, at) in cases {
        assert!(
            fired_rules(source, below).contains(rule),
            "{rule} should fire at {below}"
        );
        assert!(
            !fired_rules(source, at).contains(rule),
            "{rule} should not fire at {at}"
        );
    }
}
