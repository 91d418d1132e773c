//! Exercises 5-9: branches, merges and conflicts.

use crate::content::FileEntry;
use crate::scenario::{Expectation, Scenario, ScenarioBuilder};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

use super::MAIN;

const BRANCH_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Portfolio</title>
</head>
<body>
    <header>
        <h1>My portfolio</h1>
    </header>
    <main>
        <p>Welcome to my projects page.</p>
    </main>
</body>
</html>
"#;

const BRANCH_README: &str = "# 🌿 Exercise: working with branches

## 🎯 Goal
Develop a feature on its own branch without touching `main`.

## 📋 Steps

1. `git branch`: list branches (only `main` for now)
2. `git switch -c feature-contact`: create and switch
3. Add a contact section to `index.html` and commit it
4. `git switch main`: the contact section disappears
5. `git log --oneline --all --graph`: see both lines of history

## 💡 Tips
- A branch is a movable pointer to a commit
- `git branch -d <name>` deletes a merged branch
";

pub(super) fn branch() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Branch, "Exercise ready: branches", "ex05-branch")
        .write([
            FileEntry::new("README.md", BRANCH_README),
            FileEntry::new("index.html", BRANCH_INDEX),
        ])
        .git(GitOp::init(MAIN))
        .git(GitOp::add_all())
        .git(GitOp::commit("Initial commit: portfolio page"))
        .ends_on(MAIN)
        .highlight("🔧 Repository initialised with 1 commit")
        .instructions(&[
            "List the existing branches",
            "Create a feature-contact branch and switch to it",
            "Add a contact section to index.html and commit it",
            "Switch back to main and compare",
            "Show the history of every branch as a graph",
        ])
        .build()
}

const FF_BASE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Bakery</title>
</head>
<body>
    <h1>The Corner Bakery</h1>
    <p>Fresh bread every morning.</p>
</body>
</html>
"#;

const FF_FOOTER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Bakery</title>
</head>
<body>
    <h1>The Corner Bakery</h1>
    <p>Fresh bread every morning.</p>
    <footer>
        <p>Open Tuesday to Sunday, 7am - 7pm</p>
    </footer>
</body>
</html>
"#;

const FF_README: &str = "# ⏩ Exercise: fast-forward merge

## 🎯 Goal
Merge a branch whose history simply continues `main`.

## 📁 Initial state
- `main`: the base page
- `feature-footer`: one extra commit adding a footer
- `main` has not moved since `feature-footer` was created

## 📋 Steps

1. `git log --oneline --all --graph`: the history is a straight line
2. From `main`: `git merge feature-footer`
3. Git reports `Fast-forward`: no merge commit was created
4. `git log --oneline`: `main` now points at the footer commit

## 💡 Tips
- A fast-forward only moves the branch pointer
- `git merge --ff-only` refuses anything else
";

pub(super) fn merge_ff() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::MergeFf,
        "Exercise ready: fast-forward merge",
        "ex06-merge-ff",
    )
    .write([
        FileEntry::new("README.md", FF_README),
        FileEntry::new("index.html", FF_BASE),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: bakery page"))
    .git(GitOp::checkout_new("feature-footer"))
    .commit_file(FileEntry::new("index.html", FF_FOOTER), "Add opening hours footer")
    .git(GitOp::checkout(MAIN))
    .expect(Expectation::FastForward {
        repo: "ex06-merge-ff".into(),
        base: MAIN.into(),
        tip: "feature-footer".into(),
    })
    .ends_on(MAIN)
    .highlight("⏩ feature-footer is 1 commit ahead of main, main has not moved")
    .instructions(&[
        "Look at the history of both branches",
        "Merge feature-footer into main",
        "Check that no merge commit was created",
    ])
    .build()
}

const NOFF_BASE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Coffee Club</title>
</head>
<body>
    <header>
        <h1>Coffee Club</h1>
        <nav>Home | Menu | Contact</nav>
    </header>

    <main>
        <h2>Our beans</h2>
        <p>Single origin, roasted weekly.</p>
    </main>

    <footer>
        <p>Coffee Club, 12 Market Street</p>
    </footer>
</body>
</html>
"#;

const NOFF_CTA: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Coffee Club</title>
</head>
<body>
    <header>
        <h1>Coffee Club</h1>
        <nav>Home | Menu | Contact</nav>
    </header>

    <main>
        <h2>Our beans</h2>
        <p>Single origin, roasted weekly.</p>
        <button class="cta">Join the club</button>
    </main>

    <footer>
        <p>Coffee Club, 12 Market Street</p>
    </footer>
</body>
</html>
"#;

const NOFF_COPYRIGHT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Coffee Club</title>
</head>
<body>
    <header>
        <h1>Coffee Club</h1>
        <nav>Home | Menu | Contact</nav>
    </header>

    <main>
        <h2>Our beans</h2>
        <p>Single origin, roasted weekly.</p>
    </main>

    <footer>
        <p>Coffee Club, 12 Market Street</p>
        <p>&copy; 2024 Coffee Club</p>
    </footer>
</body>
</html>
"#;

const NOFF_README: &str = "# 🔀 Exercise: merge commit (--no-ff)

## 🎯 Goal
Merge two branches that both moved on, keeping a trace of the feature.

## 📁 Initial state
- `feature-cta`: adds a call-to-action button in `<main>`
- `main`: adds a copyright line in `<footer>`
- The changes touch different parts of `index.html`: no conflict

## 📋 Steps

1. `git log --oneline --all --graph`: the branches have diverged
2. From `main`: `git merge --no-ff feature-cta`
3. Write or accept the merge commit message
4. `git log --oneline --graph`: the merge commit has two parents

## 💡 Tips
- `--no-ff` forces a merge commit even when a fast-forward is possible
- The merge commit records that a feature branch existed
";

pub(super) fn merge_noff() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::MergeNoff,
        "Exercise ready: merge commit",
        "ex07-merge-noff",
    )
    .write([
        FileEntry::new("README.md", NOFF_README),
        FileEntry::new("index.html", NOFF_BASE),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: coffee club page"))
    .git(GitOp::checkout_new("feature-cta"))
    .commit_file(FileEntry::new("index.html", NOFF_CTA), "Add join button")
    .git(GitOp::checkout(MAIN))
    .commit_file(FileEntry::new("index.html", NOFF_COPYRIGHT), "Add copyright notice")
    .ends_on(MAIN)
    .highlight("🔀 main and feature-cta each have 1 commit since they diverged")
    .instructions(&[
        "Look at the diverging history",
        "Merge feature-cta into main with a merge commit",
        "Check the merge commit and its two parents",
    ])
    .build()
}

const SIMPLE_BASE: &str = "Company slogan
==============

Quality since 1985.
";

const SIMPLE_CLIENT: &str = "Company slogan
==============

Your success, our passion.
";

const SIMPLE_INTERNAL: &str = "Company slogan
==============

Innovate, deliver, repeat.
";

const SIMPLE_README: &str = "# ⚔️ Exercise: resolving a simple conflict

## 🎯 Goal
Finish a merge that stopped on a conflict.

## 📁 Initial state
- You are on `version-client`
- `git merge version-interne` was run and stopped: both branches rewrote
  the slogan in `message.txt`

## 📋 Steps

1. `git status`: `message.txt` is listed under \"Unmerged paths\"
2. Open `message.txt` and find the `<<<<<<<`, `=======`, `>>>>>>>` markers
3. Keep one slogan (or write a new one) and delete the markers
4. `git add message.txt`
5. `git commit` to conclude the merge

## 💡 Tips
- `git merge --abort` goes back to the state before the merge
- `git diff` during a conflict shows both sides
";

pub(super) fn conflict_simple() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::ConflictSimple,
        "Exercise ready: simple conflict",
        "ex08-conflict-simple",
    )
    .write([
        FileEntry::new("README.md", SIMPLE_README),
        FileEntry::new("message.txt", SIMPLE_BASE),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: company slogan"))
    .git(GitOp::checkout_new("version-client"))
    .commit_file(FileEntry::new("message.txt", SIMPLE_CLIENT), "Client-facing slogan")
    .git(GitOp::checkout(MAIN))
    .git(GitOp::checkout_new("version-interne"))
    .commit_file(FileEntry::new("message.txt", SIMPLE_INTERNAL), "Internal slogan")
    .git(GitOp::checkout("version-client"))
    .git_expect_failure(GitOp::merge("version-interne"))
    .expect(Expectation::ConflictMarkers {
        repo: "ex08-conflict-simple".into(),
        path: "message.txt".into(),
        blocks: 1,
    })
    .ends_on("version-client")
    .highlight("⚔️  Merge in progress: message.txt has 1 conflict")
    .instructions(&[
        "Check the repository state",
        "Open message.txt and resolve the conflict",
        "Mark the file as resolved",
        "Conclude the merge with a commit",
    ])
    .build()
}

const COMPLEX_BASE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Studio</title>
</head>
<body>
    <header class="header">
        <h1>Studio</h1>
    </header>

    <main>
        <section id="about">
            <h2>About us</h2>
            <p>We design websites for small businesses.</p>
        </section>
        <section id="work">
            <h2>Our work</h2>
            <p>Forty projects delivered since 2015.</p>
        </section>
    </main>

    <footer class="footer">
        <p>Studio, all rights reserved</p>
    </footer>
</body>
</html>
"#;

const COMPLEX_V1: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Studio</title>
</head>
<body>
    <header class="header header--modern">
        <h1>Studio ✨ Modern design</h1>
    </header>

    <main>
        <section id="about">
            <h2>About us</h2>
            <p>We design websites for small businesses.</p>
        </section>
        <section id="work">
            <h2>Our work</h2>
            <p>Forty projects delivered since 2015.</p>
        </section>
    </main>

    <footer class="footer footer--dark">
        <p>Studio 2024, made with love</p>
    </footer>
</body>
</html>
"#;

const COMPLEX_V2: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Studio</title>
</head>
<body>
    <header class="header header--corporate">
        <h1>Studio | Corporate identity</h1>
    </header>

    <main>
        <section id="about">
            <h2>About us</h2>
            <p>We design websites for small businesses.</p>
        </section>
        <section id="work">
            <h2>Our work</h2>
            <p>Forty projects delivered since 2015.</p>
        </section>
    </main>

    <footer class="footer footer--light">
        <p>Studio Ltd, registered company 0042</p>
    </footer>
</body>
</html>
"#;

const COMPLEX_README: &str = "# 🧩 Exercise: resolving several conflicts

## 🎯 Goal
Resolve a merge where the same file conflicts in two places.

## 📁 Initial state
- You are on `design-v1`
- `git merge design-v2` stopped: both designs changed the header AND
  the footer of `page.html`

## 📋 Steps

1. `git status` and `git diff` to see both conflicts
2. Resolve the header conflict
3. Resolve the footer conflict
4. Make sure no `<<<<<<<` marker is left: `grep -n '<<<<<<<' page.html`
5. `git add page.html` then `git commit`

## 💡 Tips
- `git checkout --ours page.html` / `--theirs` take one whole side
- `git mergetool` opens a graphical tool if one is configured
";

pub(super) fn conflict_complex() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::ConflictComplex,
        "Exercise ready: multiple conflicts",
        "ex09-conflict-complex",
    )
    .write([
        FileEntry::new("README.md", COMPLEX_README),
        FileEntry::new("page.html", COMPLEX_BASE),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: studio page"))
    .git(GitOp::checkout_new("design-v1"))
    .commit_file(FileEntry::new("page.html", COMPLEX_V1), "Modern design")
    .git(GitOp::checkout(MAIN))
    .git(GitOp::checkout_new("design-v2"))
    .commit_file(FileEntry::new("page.html", COMPLEX_V2), "Corporate design")
    .git(GitOp::checkout("design-v1"))
    .git_expect_failure(GitOp::merge("design-v2"))
    .expect(Expectation::ConflictMarkers {
        repo: "ex09-conflict-complex".into(),
        path: "page.html".into(),
        blocks: 2,
    })
    .ends_on("design-v1")
    .highlight("🧩 Merge in progress: page.html has 2 conflicts (header and footer)")
    .instructions(&[
        "Check the repository state",
        "Resolve the header conflict",
        "Resolve the footer conflict",
        "Mark page.html as resolved and conclude the merge",
    ])
    .build()
}
