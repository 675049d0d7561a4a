//! Catalog of editor languages and the sample document each one starts with.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Language {
    pub id: &'static str,
    pub display_name: &'static str,
    pub extension: &'static str,
    /// Document loaded when the language is selected
    pub sample: &'static str,
}

/// Languages in the order they are offered to users
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        id: "javascript",
        display_name: "JavaScript",
        extension: "js",
        sample: r#"// Welcome to JavaScript!
// A dynamic programming language for web development

function greeting(name) {
  return `Hello, ${name}! Welcome to CodeTribe.`;
}

const message = greeting("Developer");
console.log(message);
console.log("Try editing this code!");"#,
    },
    Language {
        id: "typescript",
        display_name: "TypeScript",
        extension: "ts",
        sample: r#"// Welcome to TypeScript!
// JavaScript with static types

interface User {
  name: string;
  age: number;
}

function describe(user: User): string {
  return `${user.name} is ${user.age}`;
}

console.log("TypeScript compiled and ran");"#,
    },
    Language {
        id: "python",
        display_name: "Python",
        extension: "py",
        sample: r#"# Welcome to Python!

def fibonacci(n):
    """Generate fibonacci sequence up to n terms"""
    sequence = [0, 1]
    for i in range(2, n):
        sequence.append(sequence[i-1] + sequence[i-2])
    return sequence[:n]

fib_numbers = fibonacci(10)
print("Hello from CodeTribe!")
print(fib_numbers)"#,
    },
    Language {
        id: "html",
        display_name: "HTML",
        extension: "html",
        sample: r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>CodeTribe</title>
</head>
<body>
  <h1>Hello, CodeTribe!</h1>
  <p>Edit this page together and watch the preview update.</p>
</body>
</html>"#,
    },
    Language {
        id: "css",
        display_name: "CSS",
        extension: "css",
        sample: r#"/* Welcome to CSS! */
body {
  font-family: system-ui, sans-serif;
  background: #0f172a;
  color: #e2e8f0;
}

.box {
  padding: 1rem;
  border-radius: 8px;
  background: #3b82f6;
}"#,
    },
    Language {
        id: "json",
        display_name: "JSON",
        extension: "json",
        sample: r#"{
  "project": "CodeTribe",
  "languages": 16,
  "features": ["collaboration", "chat", "live preview"],
  "active": true
}"#,
    },
    Language {
        id: "markdown",
        display_name: "Markdown",
        extension: "md",
        sample: r#"# CodeTribe

Collaborative editing for **everyone**.

- Create a session
- Share the 8-character code
- Code together"#,
    },
    Language {
        id: "sql",
        display_name: "SQL",
        extension: "sql",
        sample: r#"-- Welcome to SQL!
CREATE TABLE users (
  id INTEGER PRIMARY KEY,
  username TEXT NOT NULL,
  email TEXT NOT NULL
);

INSERT INTO users (username, email) VALUES ('alice_dev', 'alice@codetribe.com');
INSERT INTO users (username, email) VALUES ('bob_coder', 'bob@codetribe.com');

SELECT * FROM users;"#,
    },
    Language {
        id: "java",
        display_name: "Java",
        extension: "java",
        sample: r#"public class Main {
    public static void main(String[] args) {
        String team = "CodeTribe";
        System.out.println("Hello from Java!");
        System.out.println("Team: " + team);
    }
}"#,
    },
    Language {
        id: "cpp",
        display_name: "C++",
        extension: "cpp",
        sample: r#"#include <iostream>
using namespace std;

int main() {
    cout << "Hello from C++!" << endl;
    return 0;
}"#,
    },
    Language {
        id: "c",
        display_name: "C",
        extension: "c",
        sample: r#"#include <stdio.h>

int main(void) {
    int users = 3;
    printf("Hello from C!\n");
    printf("Active users: %d\n", users);
    return 0;
}"#,
    },
    Language {
        id: "csharp",
        display_name: "C#",
        extension: "cs",
        sample: r#"using System;

class Program
{
    static void Main()
    {
        Console.WriteLine("Hello from C#!");
    }
}"#,
    },
    Language {
        id: "go",
        display_name: "Go",
        extension: "go",
        sample: r#"package main

import "fmt"

func main() {
	fmt.Println("Hello from Go!")
}"#,
    },
    Language {
        id: "rust",
        display_name: "Rust",
        extension: "rs",
        sample: r#"fn main() {
    let team = vec!["alice", "bob"];
    println!("Hello from Rust!");
    println!("{} members", team.len());
}"#,
    },
    Language {
        id: "php",
        display_name: "PHP",
        extension: "php",
        sample: r#"<?php
$team = "CodeTribe";
echo "Hello from PHP!";
echo "Team: $team";
?>"#,
    },
    Language {
        id: "ruby",
        display_name: "Ruby",
        extension: "rb",
        sample: r#"# Welcome to Ruby!
team = "CodeTribe"
puts "Hello from Ruby!"
puts "Team: #{team}""#,
    },
];

/// Look up a language by id
pub fn find(id: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.id == id)
}

/// File name offered when downloading the document
pub fn download_filename(id: &str) -> String {
    let extension = find(id).map_or("txt", |l| l.extension);
    format!("codetribe-file.{}", extension)
}
