//! Exercises 18-20: tags, cherry-pick, bisect.

use crate::content::FileEntry;
use crate::scenario::{Expectation, Scenario, ScenarioBuilder};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

use super::MAIN;

fn app_js(version: &str, features: &[&str]) -> String {
    let mut text = format!("// Task manager\nconst VERSION = '{}';\n\n", version);
    for feature in features {
        text.push_str(feature);
        text.push('\n');
    }
    text.push_str("\nconsole.log(`Task manager v${VERSION}`);\n");
    text
}

const FEATURE_TASKS: &str = "function addTask(list, title) {
    return [...list, { title, done: false }];
}
";

const FEATURE_CONFIG: &str = "function loadConfig() {
    return { theme: 'light', autosave: true };
}
";

const FEATURE_UI: &str = "function render(list) {
    list.forEach((task) => console.log(`${task.done ? '[x]' : '[ ]'} ${task.title}`));
}
";

const FEATURE_STABLE: &str = "function completeTask(list, index) {
    return list.map((task, i) => (i === index ? { ...task, done: true } : task));
}
";

const TAGS_README: &str = "# 🏷️ Exercise: marking releases with tags

## 🎯 Goal
Tag the stable release and explore existing tags.

## 📁 Initial state
- Four commits on `main`: v0.1, v0.5, v0.9, v1.0
- `v0.9.0` is already tagged (annotated tag)
- The last commit is the stable 1.0 release, not tagged yet

## 📋 Steps

1. `git tag`: list the tags
2. `git show v0.9.0`: an annotated tag has its own message and author
3. `git tag -a v1.0.0 -m \"Version 1.0.0 - Stable\"`
4. `git log --oneline --decorate`: tags appear next to their commits
5. `git checkout v0.9.0` to look at the beta, then `git switch main`

## 💡 Tips
- `git tag v1.0.0` (no `-a`) creates a lightweight tag
- Tags are not pushed by default: `git push origin --tags`
";

pub(super) fn tags() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Tags, "Exercise ready: tags", "ex18-tags")
        .write([
            FileEntry::new("README.md", TAGS_README),
            FileEntry::new("app.js", app_js("0.1", &[FEATURE_TASKS])),
        ])
        .git(GitOp::init(MAIN))
        .git(GitOp::add_all())
        .git(GitOp::commit("Initial commit: version 0.1"))
        .commit_file(
            FileEntry::new("app.js", app_js("0.5", &[FEATURE_TASKS, FEATURE_CONFIG])),
            "Load configuration (v0.5)",
        )
        .commit_file(
            FileEntry::new(
                "app.js",
                app_js("0.9", &[FEATURE_TASKS, FEATURE_CONFIG, FEATURE_UI]),
            ),
            "Beta with user interface (v0.9)",
        )
        .git(GitOp::annotated_tag("v0.9.0", "Version 0.9.0 - Beta"))
        .commit_file(
            FileEntry::new(
                "app.js",
                app_js(
                    "1.0",
                    &[FEATURE_TASKS, FEATURE_CONFIG, FEATURE_UI, FEATURE_STABLE],
                ),
            ),
            "Stable release v1.0",
        )
        .expect(Expectation::Tag {
            repo: "ex18-tags".into(),
            name: "v0.9.0".into(),
        })
        .ends_on(MAIN)
        .highlight("📝 Last commit is ready for tag v1.0.0")
        .instructions(&[
            "List the existing tags",
            "Show the details of v0.9.0",
            "Create an annotated tag v1.0.0 on the last commit",
            "Show the history with tags",
        ])
        .build()
}

const UTILS_BASE: &str = "// Shop utilities

function calculateTotal(items) {
    // BUG: quantities are ignored
    return items.reduce((sum, item) => sum + item.price, 0);
}

function formatDate(date) {
    return date.toISOString().slice(0, 10);
}

module.exports = { calculateTotal, formatDate };
";

const UTILS_WIP: &str = "// Shop utilities

function calculateTotal(items) {
    // BUG: quantities are ignored
    return items.reduce((sum, item) => sum + item.price, 0);
}

function formatDate(date) {
    return date.toISOString().slice(0, 10);
}

// WIP: timezone handling missing
function formatDateTime(date) {
    return date.toISOString().replace('T', ' ');
}

module.exports = { calculateTotal, formatDate, formatDateTime };
";

const UTILS_FIX: &str = "// Shop utilities

function calculateTotal(items) {
    return items.reduce((sum, item) => sum + item.price * item.quantity, 0);
}

function formatDate(date) {
    return date.toISOString().slice(0, 10);
}

// WIP: timezone handling missing
function formatDateTime(date) {
    return date.toISOString().replace('T', ' ');
}

module.exports = { calculateTotal, formatDate, formatDateTime };
";

const UTILS_CURRENCY: &str = "// Shop utilities

function calculateTotal(items) {
    return items.reduce((sum, item) => sum + item.price * item.quantity, 0);
}

function formatDate(date) {
    return date.toISOString().slice(0, 10);
}

// WIP: timezone handling missing
function formatDateTime(date) {
    return date.toISOString().replace('T', ' ');
}

function formatCurrency(amount) {
    return `${amount.toFixed(2)} EUR`;
}

module.exports = { calculateTotal, formatDate, formatDateTime, formatCurrency };
";

const CHERRY_README: &str = "# 🍒 Exercise: picking one commit with git cherry-pick

## 🎯 Goal
Bring a single bug fix into `release` without the unfinished work around it.

## 📁 Initial state
- `release` (current branch): `calculateTotal` ignores quantities 🐛
- `feature-a`: three commits
  1. `WIP: add formatDateTime` (not ready)
  2. `Bugfix: calculateTotal takes quantities into account` ✅
  3. `Add formatCurrency` (not ready)

## 📋 Steps

1. `git log --oneline feature-a`: find the bugfix hash
2. `git cherry-pick <hash>`
3. `git log --oneline`: `release` got a new commit with the fix only
4. Check `utils.js`: no `formatDateTime`, no `formatCurrency`

## 💡 Tips
- The picked commit gets a new hash on `release`
- `git cherry-pick -x` records the original hash in the message
";

pub(super) fn cherry_pick() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::CherryPick,
        "Exercise ready: cherry-pick",
        "ex19-cherry-pick",
    )
    .write([
        FileEntry::new("README.md", CHERRY_README),
        FileEntry::new("utils.js", UTILS_BASE),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: base utilities"))
    .git(GitOp::branch("release"))
    .git(GitOp::checkout_new("feature-a"))
    .commit_file(FileEntry::new("utils.js", UTILS_WIP), "WIP: add formatDateTime")
    .commit_file(
        FileEntry::new("utils.js", UTILS_FIX),
        "Bugfix: calculateTotal takes quantities into account",
    )
    .commit_file(FileEntry::new("utils.js", UTILS_CURRENCY), "Add formatCurrency")
    .git(GitOp::checkout("release"))
    .ends_on("release")
    .highlight("🐛 release still has the calculateTotal bug")
    .highlight("🌿 feature-a holds the bugfix among other commits")
    .instructions(&[
        "Show the commits of feature-a",
        "Identify the bugfix commit",
        "Apply only that commit to release",
        "Check that the other features did not come along",
    ])
    .build()
}

/// `calc.js` as of commit `version` (1-6). Version 4 breaks `multiply`.
fn calc_js(version: u32) -> String {
    let refactored = version >= 4;
    let mut text = String::from("// Calculator\n\n");
    if refactored {
        text.push_str("const add = (a, b) => a + b;\n");
        text.push_str("const multiply = (a, b) => a + b;\n");
        if version >= 2 {
            text.push_str("const subtract = (a, b) => a - b;\n");
        }
        text.push_str("const divide = (a, b) => (b === 0 ? NaN : a / b);\n");
        if version >= 5 {
            text.push_str("const power = (a, b) => a ** b;\n");
        }
        if version >= 6 {
            text.push_str("const modulo = (a, b) => a % b;\n");
        }
    } else {
        text.push_str("function add(a, b) {\n    return a + b;\n}\n\n");
        text.push_str("function multiply(a, b) {\n    return a * b;\n}\n");
        if version >= 2 {
            text.push_str("\nfunction subtract(a, b) {\n    return a - b;\n}\n");
        }
        if version >= 3 {
            text.push_str("\nfunction divide(a, b) {\n    if (b === 0) {\n        return NaN;\n    }\n    return a / b;\n}\n");
        }
    }

    let mut exported = vec!["add", "multiply"];
    if version >= 2 {
        exported.push("subtract");
    }
    if version >= 3 {
        exported.push("divide");
    }
    if version >= 5 {
        exported.push("power");
    }
    if version >= 6 {
        exported.push("modulo");
    }
    text.push_str(&format!("\nmodule.exports = {{ {} }};\n", exported.join(", ")));
    text
}

const CALC_MESSAGES: &[&str] = &[
    "v1: add and multiply",
    "v2: add subtract",
    "v3: add divide",
    "v4: refactor to arrow functions",
    "v5: add power",
    "v6: add modulo",
];

const BISECT_TEST: &str = r#"#!/bin/sh
# Exit 0 when multiply works, 1 otherwise.
# Usage: ./test.sh   or   git bisect run ./test.sh
node -e "const { multiply } = require('./calc.js'); process.exit(multiply(4, 5) === 20 ? 0 : 1);"
"#;

const BISECT_README: &str = "# 🔎 Exercise: hunting a regression with git bisect

## 🎯 Goal
Find the commit that broke `multiply` among six.

## 📁 Initial state
- Six commits on `main` evolve `calc.js`
- `multiply(4, 5)` returned 20 in v1, it does not anymore
- `test.sh` exits 0 when multiply works, 1 otherwise (needs node)

## 📋 Steps

1. `git bisect start`
2. `git bisect bad` (the current commit is broken)
3. `git bisect good <hash of v1>`
4. Test each proposed commit and answer `git bisect good` or `bad`
5. Or let Git do it: `git bisect run ./test.sh`
6. `git bisect reset` when the culprit is found

## 💡 Tips
- Bisect needs about log2(n) steps: 3 here
- `git bisect log` shows the answers given so far
";

pub(super) fn bisect() -> Scenario {
    let mut builder = ScenarioBuilder::new(
        ScenarioId::Bisect,
        "Exercise ready: git bisect",
        "ex20-bisect",
    )
    .write([
        FileEntry::new("README.md", BISECT_README),
        FileEntry::executable("test.sh", BISECT_TEST),
        FileEntry::new("calc.js", calc_js(1)),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit(CALC_MESSAGES[0]));
    for (i, message) in CALC_MESSAGES.iter().enumerate().skip(1) {
        let version = i as u32 + 1;
        builder = builder.commit_file(FileEntry::new("calc.js", calc_js(version)), message);
    }
    builder
        .ends_on(MAIN)
        .highlight("📝 6 commits created, one of them introduced a bug...")
        .highlight("🔧 test.sh is provided to automate the check")
        .instructions(&[
            "Start a bisect session",
            "Mark the current commit as bad and the first one as good",
            "Test each commit Git proposes (or use git bisect run)",
            "Identify the faulty commit and end the session",
        ])
        .build()
}
