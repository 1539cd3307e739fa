use crate::subprocess::ProcessCommand;

pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                capture_output: false,
                interactive: false,
            },
        }
    }

    /// `sh -c <script>`
    pub fn shell(script: &str) -> Self {
        Self::new("sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command
            .args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.command.capture_output = capture;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.command.interactive = interactive;
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
