#![allow(dead_code)]
//! Hosts de prueba compartidos por los tests de integración.

use std::sync::Arc;

use serde_json::Value;
use story_core::{outputs, BoundStory, Contract, ContextView, ContractViolation, Host, Outcome, Outputs, Registry,
                 StepResult, StoryDeclaration};

// Steps reutilizables (genéricos sobre el host, como un mixin).

pub fn one<H>(_: &H, _: &ContextView<'_>) -> StepResult {
    Ok(Outcome::success().into())
}

pub fn two<H>(_: &H, ctx: &ContextView<'_>) -> StepResult {
    let foo: i64 = ctx.value("foo")?;
    let bar: i64 = ctx.value("bar")?;
    if foo > 1 {
        return Ok(Outcome::failure().into());
    }
    if bar < 0 {
        return Ok(Outcome::skip().into());
    }
    Ok(Outcome::Success(outputs! { "baz" => 4 }).into())
}

pub fn three<H>(_: &H, ctx: &ContextView<'_>) -> StepResult {
    let bar: i64 = ctx.value("bar")?;
    let baz: i64 = ctx.value("baz")?;
    Ok(Outcome::result(bar - baz).into())
}

pub fn plain<H>(_: &H, _: &ContextView<'_>) -> StepResult {
    Ok(None)
}

pub fn start<H>(_: &H, ctx: &ContextView<'_>) -> StepResult {
    let spam: i64 = ctx.value("spam")?;
    Ok(Outcome::Success(outputs! { "foo" => spam - 1 }).into())
}

pub fn before<H>(_: &H, ctx: &ContextView<'_>) -> StepResult {
    let spam: i64 = ctx.value("spam")?;
    Ok(Outcome::Success(outputs! { "bar" => spam + 1 }).into())
}

pub fn after<H>(_: &H, ctx: &ContextView<'_>) -> StepResult {
    let spam: i64 = ctx.value("spam")?;
    Ok(Outcome::result(spam * 2).into())
}

pub fn skip<H>(_: &H, _: &ContextView<'_>) -> StepResult {
    Ok(Outcome::skip().into())
}

pub fn fail<H>(_: &H, _: &ContextView<'_>) -> StepResult {
    Ok(Outcome::failure().into())
}

fn simple_x() -> StoryDeclaration {
    StoryDeclaration::new("x").arguments(["foo", "bar"])
                              .body(["one", "two", "three"])
}

/// x(foo, bar) = one, two, three
pub struct Simple;

impl Host for Simple {
    fn register(r: &mut Registry<Self>) {
        r.step("one", one)
         .step("two", two)
         .step("three", three)
         .story(simple_x());
    }
}

/// y(spam) = start, before, x, after; z = first, x
pub struct SimpleSubstory;

impl Host for SimpleSubstory {
    fn register(r: &mut Registry<Self>) {
        r.step("one", one)
         .step("two", two)
         .step("three", three)
         .step("start", start)
         .step("before", before)
         .step("after", after)
         .step("first", skip)
         .story(simple_x())
         .story(StoryDeclaration::new("y").arguments(["spam"])
                                          .body(["start", "before", "x", "after"]))
         .story(StoryDeclaration::new("z").arguments(["spam"]).body(["first", "x"]));
    }
}

/// y(spam) = start, before, x (inyectada), after
pub struct SubstoryDI {
    pub x: BoundStory,
}

impl SubstoryDI {
    pub fn new(x: BoundStory) -> Arc<Self> {
        Arc::new(Self { x })
    }
}

impl Host for SubstoryDI {
    fn register(r: &mut Registry<Self>) {
        r.step("start", start)
         .step("before", before)
         .step("after", after)
         .inject("x", |h| h.x.clone())
         .story(StoryDeclaration::new("y").arguments(["spam"])
                                          .body(["start", "before", "x", "after"]));
    }
}

/// x = one, two, three (todos `Success()` sin variables)
pub struct Pipe;

impl Host for Pipe {
    fn register(r: &mut Registry<Self>) {
        r.step("one", one)
         .step("two", one)
         .step("three", one)
         .story(StoryDeclaration::new("x").body(["one", "two", "three"]));
    }
}

pub struct Empty;

impl Host for Empty {
    fn register(r: &mut Registry<Self>) {
        r.story(StoryDeclaration::new("x"));
    }
}

pub struct EmptySubstory;

impl Host for EmptySubstory {
    fn register(r: &mut Registry<Self>) {
        r.story(StoryDeclaration::new("x"))
         .story(StoryDeclaration::new("y").body(["x"]));
    }
}

/// outer(a) = begin, middle, end; middle = m1, inner, m2; inner = i1 (skip), i2
pub struct Nested;

impl Host for Nested {
    fn register(r: &mut Registry<Self>) {
        r.step("begin", one)
         .step("m1", one)
         .step("i1", skip)
         .step("i2", fail)
         .step("m2", |_, _| Ok(Outcome::Success(outputs! { "m2" => true }).into()))
         .step("end", |_, ctx| Ok(Outcome::result(ctx.value::<bool>("m2")?).into()))
         .story(StoryDeclaration::new("inner").body(["i1", "i2"]))
         .story(StoryDeclaration::new("middle").body(["m1", "inner", "m2"]))
         .story(StoryDeclaration::new("outer").arguments(["a"])
                                              .body(["begin", "middle", "end"]));
    }
}

/// Result a profundidad 2: deep = begin, middle2, never; middle2 = level, returns, never
pub struct DeepResult;

impl Host for DeepResult {
    fn register(r: &mut Registry<Self>) {
        r.step("begin", one)
         .step("level", one)
         .step("returns", |_, _| Ok(Outcome::result("deep").into()))
         .step("never", fail)
         .story(StoryDeclaration::new("middle2").body(["level", "returns", "never"]))
         .story(StoryDeclaration::new("deep").body(["begin", "middle2", "never"]));
    }
}

/// x = skips, never (Skip en la historia raíz)
pub struct RootSkip;

impl Host for RootSkip {
    fn register(r: &mut Registry<Self>) {
        r.step("skips", skip)
         .step("never", fail)
         .story(StoryDeclaration::new("x").body(["skips", "never"]));
    }
}

#[derive(Debug, thiserror::Error)]
#[error("step exploded")]
pub struct Exploded;

/// x = one (devuelve un error propio)
pub struct Raising;

impl Host for Raising {
    fn register(r: &mut Registry<Self>) {
        r.step("one", |_, _| Err(Exploded.into()))
         .story(StoryDeclaration::new("x").body(["one"]));
    }
}

/// x = one, donde `one` intenta asignar o borrar según `delete`.
pub struct Mutating {
    pub delete: bool,
}

impl Host for Mutating {
    fn register(r: &mut Registry<Self>) {
        r.step("one", |h, ctx| {
             if h.delete {
                 ctx.remove("foo")?;
             } else {
                 ctx.assign("foo", 1)?;
             }
             Ok(None)
         })
         .story(StoryDeclaration::new("x").arguments(["foo"]).body(["one"]));
    }
}

/// x(foo) = one, donde `one` intenta redefinir `foo`.
pub struct Overriding;

impl Host for Overriding {
    fn register(r: &mut Registry<Self>) {
        r.step("one", |_, _| Ok(Outcome::Success(outputs! { "foo" => 2 }).into()))
         .story(StoryDeclaration::new("x").arguments(["foo"]).body(["one"]));
    }
}

/// Falla con la razón guardada en la instancia.
/// `x` declara las razones `foo` y `bar`; `plain` no declara protocolo.
pub struct Reasoned {
    pub reason: &'static str,
}

impl Host for Reasoned {
    fn register(r: &mut Registry<Self>) {
        r.step("one", |h, _| Ok(Outcome::failure_because(h.reason).into()))
         .story(StoryDeclaration::new("x").body(["one"]).failures(["foo", "bar"]))
         .story(StoryDeclaration::new("plain").body(["one"]));
    }
}

/// a = before, x; x(foo, bar) = one
pub struct ParamParent;

impl Host for ParamParent {
    fn register(r: &mut Registry<Self>) {
        r.step("before", one)
         .step("one", one)
         .story(StoryDeclaration::new("x").arguments(["foo", "bar"]).body(["one"]))
         .story(StoryDeclaration::new("a").body(["before", "x"]));
    }
}

/// a = b; b = a
pub struct Looping;

impl Host for Looping {
    fn register(r: &mut Registry<Self>) {
        r.story(StoryDeclaration::new("a").body(["b"]))
         .story(StoryDeclaration::new("b").body(["a"]));
    }
}

pub struct Broken;

impl Host for Broken {
    fn register(r: &mut Registry<Self>) {
        r.step("one", one).story(StoryDeclaration::new("x").body(["one", "nope"]));
    }
}

pub struct Duplicated;

impl Host for Duplicated {
    fn register(r: &mut Registry<Self>) {
        r.step("x", one).story(StoryDeclaration::new("x"));
    }
}

/// Contrato mínimo: sólo enteros.
#[derive(Debug)]
pub struct IntegersOnly;

impl Contract for IntegersOnly {
    fn check(&self, variables: &[(&str, &Value)]) -> Result<(), Vec<ContractViolation>> {
        let violations: Vec<ContractViolation> =
            variables.iter()
                     .filter(|(_, v)| !v.is_i64())
                     .map(|(k, _)| ContractViolation { variable: k.to_string(),
                                                       message: "expected integer".into() })
                     .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// x(foo) = one (produce `out`), con contrato de enteros.
pub struct Contracted {
    pub out: Value,
}

impl Host for Contracted {
    fn register(r: &mut Registry<Self>) {
        r.step("one", |h, _| Ok(Outcome::Success(outputs! { "out" => h.out.clone() }).into()))
         .story(StoryDeclaration::new("x").arguments(["foo"])
                                          .body(["one"])
                                          .contract(Arc::new(IntegersOnly)));
    }
}

/// Contrato de enteros que sólo conoce las variables listadas.
#[derive(Debug)]
pub struct IntegerFields(pub &'static [&'static str]);

impl Contract for IntegerFields {
    fn check(&self, variables: &[(&str, &Value)]) -> Result<(), Vec<ContractViolation>> {
        IntegersOnly.check(variables)
    }

    fn declares(&self, name: &str) -> bool {
        self.0.contains(&name)
    }
}

/// parent = [child] con contrato de enteros; child = [produce] sin contrato.
pub struct GuardedParent {
    pub outputs: Outputs,
}

impl Host for GuardedParent {
    fn register(r: &mut Registry<Self>) {
        r.step("produce", |h, _| Ok(Outcome::Success(h.outputs.clone()).into()))
         .story(StoryDeclaration::new("child").body(["produce"]))
         .story(StoryDeclaration::new("parent").body(["child"])
                                               .contract(Arc::new(IntegersOnly)));
    }
}

/// parent conoce `ham`, child conoce `eggs`; `produce` corre dentro de child.
pub struct LayeredContracts {
    pub outputs: Outputs,
}

impl Host for LayeredContracts {
    fn register(r: &mut Registry<Self>) {
        r.step("produce", |h, _| Ok(Outcome::Success(h.outputs.clone()).into()))
         .story(StoryDeclaration::new("child").body(["produce"])
                                              .contract(Arc::new(IntegerFields(&["eggs"]))))
         .story(StoryDeclaration::new("parent").body(["child"])
                                               .contract(Arc::new(IntegerFields(&["ham"]))));
    }
}

/// Un step y una historia inyectada con el mismo nombre.
pub struct StepAndInjected {
    pub inner: BoundStory,
}

impl Host for StepAndInjected {
    fn register(r: &mut Registry<Self>) {
        r.step("x", one)
         .inject("x", |h| h.inner.clone())
         .story(StoryDeclaration::new("y").body(["x"]));
    }
}

pub fn bind<H: Host>(host: H, name: &str) -> BoundStory {
    BoundStory::bind(Arc::new(host), name).expect("story should compile")
}
