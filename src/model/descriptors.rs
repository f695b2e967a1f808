use super::ClassName;
use std::iter::Peekable;
use std::str::Chars;

/// Utility trait for converting descriptors to their JVM string representations
pub trait RenderDescriptor {
    /// Turn the descriptor into a string
    fn render(&self) -> String {
        let mut string = String::new();
        self.render_to(&mut string);
        string
    }

    /// Write the descriptor to a string
    fn render_to(&self, write_to: &mut String);
}

/// Utility trait for converting types to the names Java source code uses for them
///
/// These are the names that show up in method long names (eg. `int`, `java.lang.String[]`).
pub trait RenderSource {
    /// Turn the type into its source name
    fn render_source(&self) -> String {
        let mut string = String::new();
        self.render_source_to(&mut string);
        string
    }

    /// Write the source name to a string
    fn render_source_to(&self, write_to: &mut String);
}

pub trait ParseDescriptor: Sized {
    /// Parse a descriptor from a string
    fn parse(source: &str) -> Result<Self, String> {
        let mut chars = source.chars().peekable();
        let ret = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(ret),
            Some(c) => Err(format!("Unexpected leftover input '{}'", c)),
        }
    }

    /// Read the descriptor from a character buffer
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String>;
}

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl RenderDescriptor for BaseType {
    fn render_to(&self, write_to: &mut String) {
        let c = match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        };
        write_to.push(c);
    }
}

impl RenderSource for BaseType {
    fn render_source_to(&self, write_to: &mut String) {
        let name = match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        };
        write_to.push_str(name);
    }
}

impl ParseDescriptor for BaseType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String> {
        let typ = match source.next() {
            Some('B') => BaseType::Byte,
            Some('C') => BaseType::Char,
            Some('D') => BaseType::Double,
            Some('F') => BaseType::Float,
            Some('I') => BaseType::Int,
            Some('J') => BaseType::Long,
            Some('S') => BaseType::Short,
            Some('Z') => BaseType::Boolean,
            Some(c) => return Err(format!("Invalid base type character '{}'", c)),
            None => return Err(String::from("Missing base type character")),
        };
        Ok(typ)
    }
}

/// Type of a parameter or return value (erased, so no generics)
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType {
    Base(BaseType),
    Object(ClassName),

    /// Arrays always have at least one dimension
    Array {
        dimensions: usize,
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    pub const fn int() -> FieldType {
        FieldType::Base(BaseType::Int)
    }

    pub const fn object(class_name: ClassName) -> FieldType {
        FieldType::Object(class_name)
    }

    pub fn array(element_type: FieldType) -> FieldType {
        match element_type {
            FieldType::Array {
                dimensions,
                element_type,
            } => FieldType::Array {
                dimensions: dimensions + 1,
                element_type,
            },
            other => FieldType::Array {
                dimensions: 1,
                element_type: Box::new(other),
            },
        }
    }
}

impl RenderDescriptor for FieldType {
    fn render_to(&self, write_to: &mut String) {
        match self {
            FieldType::Base(base) => base.render_to(write_to),
            FieldType::Object(class_name) => {
                write_to.push('L');
                write_to.push_str(&class_name.to_internal());
                write_to.push(';');
            }
            FieldType::Array {
                dimensions,
                element_type,
            } => {
                for _ in 0..*dimensions {
                    write_to.push('[');
                }
                element_type.render_to(write_to);
            }
        }
    }
}

impl RenderSource for FieldType {
    fn render_source_to(&self, write_to: &mut String) {
        match self {
            FieldType::Base(base) => base.render_source_to(write_to),
            FieldType::Object(class_name) => write_to.push_str(class_name.as_ref()),
            FieldType::Array {
                dimensions,
                element_type,
            } => {
                element_type.render_source_to(write_to);
                for _ in 0..*dimensions {
                    write_to.push_str("[]");
                }
            }
        }
    }
}

impl ParseDescriptor for FieldType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String> {
        match source.peek().copied() {
            Some('L') => {
                source.next();
                let mut internal_name = String::new();
                loop {
                    match source.next() {
                        Some(';') => break,
                        Some(c) => internal_name.push(c),
                        None => return Err(format!("Missing terminator for 'L{}'", internal_name)),
                    }
                }
                ClassName::from_internal(&internal_name).map(FieldType::Object)
            }
            Some('[') => {
                let mut dimensions = 0;
                while source.next_if_eq(&'[').is_some() {
                    dimensions += 1;
                }
                Ok(FieldType::Array {
                    dimensions,
                    element_type: Box::new(FieldType::parse_from(source)?),
                })
            }
            Some(_) => BaseType::parse_from(source).map(FieldType::Base),
            None => Err(String::from("Missing field type")),
        }
    }
}

/// Method signature without the name: parameter types and an optional return type
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,

    /// `None` for `void`
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Parameter list as it appears in a method long name: `(int,java.lang.String)`
    pub fn render_source_parameters(&self) -> String {
        let mut rendered = String::from("(");
        for (idx, parameter) in self.parameters.iter().enumerate() {
            if idx > 0 {
                rendered.push(',');
            }
            parameter.render_source_to(&mut rendered);
        }
        rendered.push(')');
        rendered
    }
}

impl RenderDescriptor for MethodDescriptor {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('(');
        for parameter in &self.parameters {
            parameter.render_to(write_to);
        }
        write_to.push(')');
        match &self.return_type {
            None => write_to.push('V'),
            Some(return_type) => return_type.render_to(write_to),
        }
    }
}

impl ParseDescriptor for MethodDescriptor {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, String> {
        if source.next() != Some('(') {
            return Err(String::from("Expected method descriptor to start with `(`"));
        }

        let mut parameters = vec![];
        loop {
            match source.peek() {
                Some(')') => {
                    source.next();
                    break;
                }
                Some(_) => parameters.push(FieldType::parse_from(source)?),
                None => return Err(String::from("Missing `)` in method descriptor")),
            }
        }

        let return_type = if source.next_if_eq(&'V').is_some() {
            None
        } else {
            Some(FieldType::parse_from(source)?)
        };

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }
}
