//! Built-in quiz catalog. Guarantees the app is playable without any config file.

use crate::domain::{Difficulty, Question, Quiz};

fn q(id: u32, text: &str, options: [&str; 4], correct_answer: usize, explanation: &str) -> Question {
  Question {
    id,
    text: text.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_answer,
    explanation: Some(explanation.into()),
  }
}

pub fn seed_quizzes() -> Vec<Quiz> {
  vec![
    Quiz {
      id: 1,
      title: "Web Development Basics".into(),
      description: "Test your knowledge of fundamental web development concepts.".into(),
      difficulty: Difficulty::Easy,
      category: "Programming".into(),
      time_per_question: 30,
      image: Some("https://images.pexels.com/photos/270360/pexels-photo-270360.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2".into()),
      questions: vec![
        q(1, "What does HTML stand for?",
          ["Hyper Text Markup Language", "High Tech Multi Language", "Hyper Transfer Markup Language", "Home Tool Markup Language"],
          0, "HTML stands for Hyper Text Markup Language. It is the standard markup language for creating Web pages."),
        q(2, "Which of the following is used to add styles to a webpage?",
          ["JavaScript", "CSS", "Python", "Java"],
          1, "CSS (Cascading Style Sheets) is used to style and layout web pages."),
        q(3, "Which of these is NOT a JavaScript framework or library?",
          ["React", "Angular", "Django", "Vue"],
          2, "Django is a high-level Python web framework, not a JavaScript framework or library."),
        q(4, "What is the correct way to comment in JavaScript?",
          ["<!-- This is a comment -->", "// This is a comment", "/* This is a comment */", "Both B and C"],
          3, "In JavaScript, you can use // for single-line comments and /* */ for multi-line comments."),
        q(5, "What does API stand for?",
          ["Application Programming Interface", "Application Process Integration", "Automated Programming Interface", "Application Protocol Interface"],
          0, "API stands for Application Programming Interface. It allows different software applications to communicate with each other."),
      ],
    },
    Quiz {
      id: 2,
      title: "JavaScript Fundamentals".into(),
      description: "Challenge yourself with core JavaScript concepts and practices.".into(),
      difficulty: Difficulty::Medium,
      category: "Programming".into(),
      time_per_question: 45,
      image: Some("https://images.pexels.com/photos/4164418/pexels-photo-4164418.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2".into()),
      questions: vec![
        q(1, "What is the output of: console.log(typeof [])?",
          ["\"array\"", "\"object\"", "\"undefined\"", "\"string\""],
          1, "In JavaScript, arrays are actually objects, so typeof [] returns \"object\"."),
        q(2, "Which method is used to add elements to the end of an array?",
          ["push()", "pop()", "unshift()", "shift()"],
          0, "The push() method adds new items to the end of an array."),
        q(3, "What is a closure in JavaScript?",
          [
            "A way to secure variables from unauthorized access",
            "A function that has access to variables from its outer function scope",
            "A method to close unused variables",
            "A function without a return statement",
          ],
          1, "A closure is a function that has access to variables from its outer (enclosing) function scope, even after the outer function has returned."),
        q(4, "What is the correct way to create a promise in JavaScript?",
          [
            "const promise = Promise(resolve, reject) => {}",
            "const promise = new Promise(resolve, reject) => {}",
            "const promise = new Promise((resolve, reject) => {})",
            "const promise = Promise((resolve, reject) => {})",
          ],
          2, "A promise is created using the Promise constructor which takes an executor function with resolve and reject parameters."),
        q(5, "What does the \"use strict\" directive do in JavaScript?",
          [
            "Forces the browser to load the page faster",
            "Enables strict mode, catching common coding mistakes",
            "Makes the code more readable",
            "Prevents the use of async/await",
          ],
          1, "\"use strict\" enables strict mode in JavaScript which helps catch common coding mistakes and \"unsafe\" actions."),
      ],
    },
    Quiz {
      id: 3,
      title: "React Essentials".into(),
      description: "Test your knowledge of React fundamentals and best practices.".into(),
      difficulty: Difficulty::Hard,
      category: "Programming".into(),
      time_per_question: 60,
      image: Some("https://images.pexels.com/photos/11035380/pexels-photo-11035380.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2".into()),
      questions: vec![
        q(1, "Which hook would you use to run side effects in a function component?",
          ["useState", "useEffect", "useContext", "useReducer"],
          1, "useEffect is used to perform side effects in function components, similar to componentDidMount, componentDidUpdate, and componentWillUnmount in class components."),
        q(2, "What is the correct way to pass a prop called \"name\" to a component?",
          [
            "<Component {name=\"John\"} />",
            "<Component name=\"John\" />",
            "<Component props={name: \"John\"} />",
            "<Component props.name=\"John\" />",
          ],
          1, "Props are passed to components using HTML-like attribute syntax: <Component name=\"John\" />"),
        q(3, "What is React Context used for?",
          [
            "To directly modify the DOM",
            "To optimize performance by skipping renders",
            "To share data between components without prop drilling",
            "To create reusable UI elements",
          ],
          2, "React Context provides a way to pass data through the component tree without having to pass props down manually at every level."),
        q(4, "What is the purpose of keys in React lists?",
          [
            "They are required for styling list items",
            "They help React identify which items have changed, are added, or removed",
            "They determine the order of list items",
            "They are used for encrypting sensitive data",
          ],
          1, "Keys help React identify which items have changed, are added, or are removed, which helps in efficient rendering of lists."),
        q(5, "Which is NOT a React Hook?",
          ["useEffect", "useState", "useDispatch", "useCallback"],
          2, "useDispatch is not a built-in React Hook; it comes from the React-Redux library. The others are built-in React Hooks."),
      ],
    },
  ]
}
